//! Application state

use axum::http::{header::AUTHORIZATION, HeaderMap};
use common::Config;
use processor::{DataSource, MetricsStore, SessionRegistry};

use crate::error::{ApiError, ApiResult};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub store: MetricsStore,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: Config, store: MetricsStore) -> Self {
        let sessions = SessionRegistry::new(config.max_sessions);
        Self {
            config,
            store,
            sessions,
        }
    }

    /// Hosting API collaborator for this caller, built fresh per request
    pub fn source(&self, token: &str) -> DataSource {
        DataSource::for_token(&self.config.github_api_url, token)
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> ApiResult<String> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Expected a Bearer token".to_string()))?;

    Ok(token.to_string())
}
