//! Axum route handlers for the profile and CV endpoints.

use anyhow::anyhow;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::profile::pipeline::{build_profile, ProfileResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Raw query pairs of the profile endpoint. A repeated key resolves to its first value.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct ProfileQuery(Vec<(String, String)>);

impl ProfileQuery {
    pub fn username(&self) -> &str {
        self.0
            .iter()
            .find(|(key, _)| key == "username")
            .map(|(_, value)| value.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateCvResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub data: Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/github-profile?username=<login>
///
/// Returns the raw user record, the five best-ranked repositories (the first two
/// with an `enhanced_description`) and the language tally.
pub async fn handle_github_profile(
    State(state): State<AppState>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> Result<Json<ProfileResult>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let result = build_profile(state.github.as_ref(), &state.describer, query.username()).await?;
    Ok(Json(result))
}

/// POST /api/generate-cv
///
/// Echoes an already-assembled CV payload back with a success marker.
pub async fn handle_generate_cv(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateCvResponse>, AppError> {
    let Json(data) = payload
        .map_err(|e| AppError::Internal(anyhow!("Error generating CV: {}", e.body_text())))?;

    Ok(Json(GenerateCvResponse {
        status: "success",
        message: "CV generated successfully",
        data,
    }))
}
