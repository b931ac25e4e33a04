mod config;
mod errors;
mod github;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::github::GitHubClient;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::profile::describer::DescriptionGenerator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvforge API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize GitHub client
    let github = GitHubClient::new(config.github_api_url.clone(), config.github_token.clone())?;
    info!(
        "GitHub client initialized (api: {}, authenticated: {})",
        github.api_url(),
        config.github_token.is_some()
    );

    // Initialize LLM client; without a key every description uses the template
    let llm: Option<Arc<dyn TextGenerator>> = match &config.groq_api_key {
        Some(api_key) => {
            let client: Arc<dyn TextGenerator> =
                Arc::new(LlmClient::new(api_key.clone(), config.llm_api_url.clone())?);
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("GROQ_API_KEY not set; project descriptions will use the template fallback");
            None
        }
    };

    let describer = DescriptionGenerator::new(llm);

    // Build app state
    let state = AppState {
        github: Arc::new(github),
        describer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
