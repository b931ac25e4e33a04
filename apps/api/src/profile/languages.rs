use std::collections::HashMap;

use crate::models::repository::RepositoryRecord;

/// Counts repositories per primary language across the full repository list.
/// Repositories without a reported language are skipped rather than bucketed.
pub fn tally_languages(repos: &[RepositoryRecord]) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for language in repos.iter().filter_map(RepositoryRecord::primary_language) {
        *counts.entry(language.to_string()).or_insert(0) += 1;
    }
    counts
}
