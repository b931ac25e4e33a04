// Profile → CV pipeline: language tally, repository ranking, project descriptions.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod describer;
pub mod handlers;
pub mod languages;
pub mod pipeline;
pub mod prompts;
pub mod ranking;
