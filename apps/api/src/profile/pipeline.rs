//! Profile pipeline — fetch → tally/rank → select → describe.
//!
//! Everything here is request-scoped. The only derived data added to the fetched
//! repositories is the ranking score and, for the leading ranks, a description.

use std::collections::HashMap;

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::github::{fetch_profile, FetchedProfile, ProfileSource};
use crate::models::repository::TopRepository;
use crate::profile::describer::DescriptionGenerator;
use crate::profile::languages::tally_languages;
use crate::profile::ranking::{rank_repositories, select_top, DESCRIBED_REPOSITORIES};

/// Response payload for `GET /api/github-profile`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResult {
    pub user_data: Value,
    pub top_repos: Vec<TopRepository>,
    pub languages: HashMap<String, u32>,
}

/// Runs the full profile pipeline for one username.
///
/// Steps:
/// 1. fetch_profile() → user record + repositories (validation happens here)
/// 2. tally_languages() over every fetched repository
/// 3. rank_repositories() → select_top() keeps the best 5
/// 4. describe the first 2 concurrently; LLM failures are absorbed per repository
pub async fn build_profile(
    source: &dyn ProfileSource,
    describer: &DescriptionGenerator,
    username: &str,
) -> Result<ProfileResult, AppError> {
    let FetchedProfile { user_data, repos } = fetch_profile(source, username).await?;

    let languages = tally_languages(&repos);
    let top = select_top(rank_repositories(repos.clone()));

    let descriptions = join_all(
        top.iter()
            .take(DESCRIBED_REPOSITORIES)
            .map(|ranked| describer.describe(&ranked.repo, &repos)),
    )
    .await;

    info!(
        "Built profile for {}: {} top repositories, {} described, {} languages",
        username.trim(),
        top.len(),
        descriptions.len(),
        languages.len()
    );

    let mut descriptions = descriptions.into_iter();
    let top_repos = top
        .into_iter()
        .map(|ranked| TopRepository {
            enhanced_description: descriptions.next(),
            ranked,
        })
        .collect();

    Ok(ProfileResult {
        user_data,
        top_repos,
        languages,
    })
}
