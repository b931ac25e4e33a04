//! Description Generator — turns a selected repository into 2–3 CV sentences.
//!
//! One LLM attempt when a provider is configured; any failure (or no provider at
//! all) falls back to a deterministic template. Failures are logged and absorbed:
//! this module never returns an error.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::llm_client::TextGenerator;
use crate::models::repository::{parse_timestamp, RepositoryRecord};
use crate::profile::prompts::{PROJECT_DESCRIPTION_PROMPT_TEMPLATE, PROJECT_DESCRIPTION_SYSTEM};

const DEFAULT_LANGUAGE: &str = "various technologies";
const DEFAULT_DESCRIPTION: &str = "software project";
/// More than this many same-language sibling projects counts as expertise.
const EXPERTISE_THRESHOLD: usize = 2;
const RECENT_WINDOW_DAYS: i64 = 90;

/// The repository facts a description is built from.
#[derive(Debug, Clone)]
pub struct ProjectFacts<'a> {
    pub name: &'a str,
    pub language: &'a str,
    pub description: &'a str,
    pub stars: u64,
    pub forks: u64,
    pub created_at: &'a str,
    pub updated_at: &'a str,
    /// Other repositories sharing this one's primary language.
    pub expertise_level: usize,
}

impl<'a> ProjectFacts<'a> {
    pub fn from_repo(repo: &'a RepositoryRecord, all_repos: &[RepositoryRecord]) -> Self {
        Self {
            name: &repo.name,
            language: repo.primary_language().unwrap_or(DEFAULT_LANGUAGE),
            description: repo
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(DEFAULT_DESCRIPTION),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            created_at: repo.created_at.as_deref().unwrap_or_default(),
            updated_at: repo.updated_at.as_deref().unwrap_or_default(),
            expertise_level: expertise_level(repo, all_repos),
        }
    }

    pub fn has_expertise(&self) -> bool {
        self.expertise_level > EXPERTISE_THRESHOLD
    }

    /// Updated within the last 90 days of `now`. Unparseable timestamps are never recent.
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        parse_timestamp(self.updated_at)
            .map(|updated| now - updated < Duration::days(RECENT_WINDOW_DAYS))
            .unwrap_or(false)
    }
}

/// Counts the other repositories (by id) with the same primary language.
/// A repository without a language has no peers.
pub fn expertise_level(repo: &RepositoryRecord, all_repos: &[RepositoryRecord]) -> usize {
    let Some(language) = repo.primary_language() else {
        return 0;
    };

    all_repos
        .iter()
        .filter(|other| other.id != repo.id && other.primary_language() == Some(language))
        .count()
}

/// Fills the user prompt template with the project facts.
pub fn build_description_prompt(facts: &ProjectFacts<'_>) -> String {
    PROJECT_DESCRIPTION_PROMPT_TEMPLATE
        .replace("{name}", facts.name)
        .replace("{language}", facts.language)
        .replace("{description}", facts.description)
        .replace("{stars}", &facts.stars.to_string())
        .replace("{forks}", &facts.forks.to_string())
        .replace("{created_at}", facts.created_at)
        .replace("{updated_at}", facts.updated_at)
        .replace(
            "{related_projects_count}",
            &facts.expertise_level.to_string(),
        )
}

/// Deterministic template used when no LLM text is available.
///
/// Always starts with the technology clause, then appends, in this order and only
/// when they apply: stars, forks, language expertise, recent activity.
pub fn fallback_description(facts: &ProjectFacts<'_>, now: DateTime<Utc>) -> String {
    let mut clauses = vec![format!(
        "Developed a {} using {}",
        facts.description, facts.language
    )];

    if facts.stars > 0 {
        clauses.push(format!(
            "Gained recognition with {} stars on GitHub",
            facts.stars
        ));
    }

    if facts.forks > 0 {
        clauses.push(format!(
            "Created code that was forked {} times by other developers",
            facts.forks
        ));
    }

    if facts.has_expertise() {
        clauses.push(format!(
            "Applied specialized {} skills developed across multiple projects",
            facts.language
        ));
    }

    if facts.is_recent(now) {
        clauses.push("Actively maintained with recent updates and enhancements".to_string());
    }

    clauses.join(" ")
}

/// Produces CV descriptions, preferring the LLM when one is configured.
#[derive(Clone)]
pub struct DescriptionGenerator {
    llm: Option<Arc<dyn TextGenerator>>,
}

impl DescriptionGenerator {
    pub fn new(llm: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { llm }
    }

    /// Describes `repo`, using `all_repos` to measure language expertise.
    /// Always returns a non-empty description.
    pub async fn describe(
        &self,
        repo: &RepositoryRecord,
        all_repos: &[RepositoryRecord],
    ) -> String {
        let facts = ProjectFacts::from_repo(repo, all_repos);

        let Some(llm) = &self.llm else {
            debug!("No LLM configured; using template description for {}", facts.name);
            return fallback_description(&facts, Utc::now());
        };

        let prompt = build_description_prompt(&facts);
        match llm.complete(PROJECT_DESCRIPTION_SYSTEM, &prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(
                    "LLM returned an empty description for {}; using template",
                    facts.name
                );
                fallback_description(&facts, Utc::now())
            }
            Err(e) => {
                warn!(
                    "LLM description generation failed for {}: {e}; using template",
                    facts.name
                );
                fallback_description(&facts, Utc::now())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::llm_client::{LlmError, TextGenerator};

    /// Replies with canned text, or fails every call when `reply` is `None`.
    /// With `fail_for` set, only prompts naming that repository fail.
    pub struct StubGenerator {
        pub reply: Option<String>,
        pub fail_for: Option<String>,
        pub calls: AtomicUsize,
    }

    impl StubGenerator {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                fail_for: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing_for(repo_name: &str, text: &str) -> Self {
            Self {
                fail_for: Some(repo_name.to_string()),
                ..Self::replying(text)
            }
        }

        pub fn failing() -> Self {
            Self {
                reply: None,
                fail_for: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let targeted = self
                .fail_for
                .as_ref()
                .is_some_and(|name| prompt.contains(&format!("Name: {name}\n")));
            let reply = if targeted { None } else { self.reply.clone() };
            reply.ok_or(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
        }
    }
}
