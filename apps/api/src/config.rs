use anyhow::{Context, Result};

use crate::github::DEFAULT_GITHUB_API_URL;
use crate::llm_client::DEFAULT_LLM_API_URL;

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; every variable has a default or is optional.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_api_url: String,
    /// Optional token; unauthenticated requests work but hit the low rate limit.
    pub github_token: Option<String>,
    pub llm_api_url: String,
    /// When absent, project descriptions always use the deterministic template.
    pub groq_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            github_api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()),
            github_token: optional_env("GITHUB_TOKEN"),
            llm_api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_API_URL.to_string()),
            groq_api_key: optional_env("GROQ_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating unset and blank values the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
