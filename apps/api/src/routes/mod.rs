pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::profile::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/github-profile", get(handlers::handle_github_profile))
        .route("/api/generate-cv", post(handlers::handle_generate_cv))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::github::stub::StubSource;
    use crate::models::repository::make_repo;
    use crate::profile::describer::DescriptionGenerator;

    fn app_with(source: Arc<StubSource>) -> Router {
        build_router(AppState {
            github: source,
            describer: DescriptionGenerator::new(None),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(StubSource::new(vec![])));
        let (status, body) = send(app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_profile_without_username_is_400_and_makes_no_calls() {
        let source = Arc::new(StubSource::new(vec![make_repo(1, Some("Rust"), 1, None)]));
        let app = app_with(source.clone());

        let (status, body) = send(app, get_request("/api/github-profile")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "GitHub username is required" }));
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_profile_with_empty_username_is_400() {
        let source = Arc::new(StubSource::new(vec![]));
        let app = app_with(source.clone());

        let (status, _) = send(app, get_request("/api/github-profile?username=")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_profile_unknown_user_is_404() {
        let app = app_with(Arc::new(StubSource::missing_user()));
        let (status, body) = send(app, get_request("/api/github-profile?username=ghost")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().starts_with("GitHub API error"));
    }

    #[tokio::test]
    async fn test_profile_repeated_username_uses_first_value() {
        let source = Arc::new(StubSource::new(vec![]));
        let app = app_with(source.clone());

        let (status, body) = send(
            app,
            get_request("/api/github-profile?username=octocat&username=hubot"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_data"]["login"], "octocat");
        assert_eq!(source.requested_usernames(), vec!["octocat".to_string()]);
    }

    #[tokio::test]
    async fn test_profile_upstream_failure_is_500() {
        let app = app_with(Arc::new(StubSource::failing_repos(403)));
        let (status, body) = send(app, get_request("/api/github-profile?username=octocat")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Error fetching GitHub data"));
        assert!(message.contains("rate limit"));
    }

    #[tokio::test]
    async fn test_profile_success() {
        let repos = (1..=6)
            .map(|id| make_repo(id, Some("Rust"), id, Some("2024-01-01T00:00:00Z")))
            .collect();
        let app = app_with(Arc::new(StubSource::new(repos)));

        let (status, body) = send(app, get_request("/api/github-profile?username=octocat")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_data"]["login"], "octocat");
        assert_eq!(body["languages"]["Rust"], 6);

        let top = body["top_repos"].as_array().unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(top[0]["id"], 6);
        assert!(top[0]["enhanced_description"].is_string());
        assert!(top[1]["enhanced_description"].is_string());
        assert!(top[4].get("enhanced_description").is_none());
    }

    #[tokio::test]
    async fn test_generate_cv_echoes_payload() {
        let app = app_with(Arc::new(StubSource::new(vec![])));
        let payload = json!({ "name": "Ada", "projects": [{ "title": "Engine" }] });
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-cv")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "CV generated successfully");
        assert_eq!(body["data"], payload);
    }

    #[tokio::test]
    async fn test_generate_cv_bad_body_is_500() {
        let app = app_with(Arc::new(StubSource::new(vec![])));
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-cv")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Error generating CV"));
    }
}
