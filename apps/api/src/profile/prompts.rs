// LLM prompt constants for project descriptions.

/// System prompt for CV project descriptions.
pub const PROJECT_DESCRIPTION_SYSTEM: &str = "You are an expert CV writer helping a fresh \
    graduate describe their GitHub projects in a professional way. \
    Create a concise, impressive description for this project that:\n\
    1. Highlights technical skills and languages used\n\
    2. Emphasizes accomplishments and impact\n\
    3. Uses strong action verbs\n\
    4. Is 2-3 sentences long\n\
    5. Is suitable for a professional CV/Resume\n\
    Make it sound professional but honest, and focus on the most relevant aspects for an employer.";

/// Project description prompt template.
/// Replace: {name}, {language}, {description}, {stars}, {forks},
///          {created_at}, {updated_at}, {related_projects_count}
pub const PROJECT_DESCRIPTION_PROMPT_TEMPLATE: &str = r#"Project details:
Name: {name}
Main language: {language}
Description: {description}
Stars: {stars}
Forks: {forks}
Created: {created_at}
Last updated: {updated_at}
Related projects by this developer using same language: {related_projects_count}

Write a professional, concise project description for a CV:"#;
