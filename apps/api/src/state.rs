use std::sync::Arc;

use crate::github::ProfileSource;
use crate::profile::describer::DescriptionGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Hosting provider lookups. `GitHubClient` in production.
    pub github: Arc<dyn ProfileSource>,
    /// Holds the optional LLM; without one every description uses the template.
    pub describer: DescriptionGenerator,
}
