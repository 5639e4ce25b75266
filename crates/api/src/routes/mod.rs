//! HTTP routes

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod pulls;
pub mod repos;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth", post(auth::login))
        .route("/api/repos", get(repos::list))
        .route(
            "/api/repos/:owner/:name/dashboard",
            get(dashboard::load),
        )
        .route("/api/session/dashboard", get(dashboard::current))
        .route(
            "/api/repos/:owner/:name/pulls/:number",
            get(pulls::detail),
        )
        .route(
            "/api/repos/:owner/:name/pulls/:number/ai-metrics",
            get(pulls::ai_metrics),
        )
        .with_state(state)
}
