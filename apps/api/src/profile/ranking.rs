//! Repository scoring and selection.
//!
//! `score = stars * 3 + unix_timestamp(updated_at) / 1_000_000`
//!
//! A star is worth 3 points, a month of recency about 2.6; among repositories with
//! equal star counts the more recently updated one ranks higher. A missing or
//! unparseable `updated_at` contributes 0 and never removes the repository from the
//! ranking.

use crate::models::repository::{RankedRepository, RepositoryRecord};

pub const STAR_WEIGHT: f64 = 3.0;
pub const RECENCY_DIVISOR: f64 = 1_000_000.0;

/// Repositories returned for display.
pub const TOP_REPOSITORIES: usize = 5;
/// Leading ranks that also receive a generated description.
pub const DESCRIBED_REPOSITORIES: usize = 2;

/// Recency term: Unix seconds of `updated_at` scaled down, or 0 when unusable.
pub fn normalized_recency(repo: &RepositoryRecord) -> f64 {
    repo.updated_at_utc()
        .map(|dt| dt.timestamp() as f64 / RECENCY_DIVISOR)
        .unwrap_or(0.0)
}

/// Depends only on the star count and `updated_at`.
pub fn score_repository(repo: &RepositoryRecord) -> f64 {
    repo.stargazers_count as f64 * STAR_WEIGHT + normalized_recency(repo)
}

/// Scores every repository and sorts by score, highest first.
///
/// The sort is stable: equal scores keep the provider's order.
pub fn rank_repositories(repos: Vec<RepositoryRecord>) -> Vec<RankedRepository> {
    let mut ranked: Vec<RankedRepository> = repos
        .into_iter()
        .map(|repo| {
            let score = score_repository(&repo);
            RankedRepository { repo, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Keeps the first `TOP_REPOSITORIES` of an already ranked list.
pub fn select_top(mut ranked: Vec<RankedRepository>) -> Vec<RankedRepository> {
    ranked.truncate(TOP_REPOSITORIES);
    ranked
}
