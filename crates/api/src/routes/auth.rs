//! Token validation

use axum::{extract::State, http::HeaderMap, Json};
use common::models::User;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::{bearer_token, AppState};

#[derive(Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub demo: bool,
}

/// Check the caller's token against `GET /user`
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<AuthResponse>> {
    let token = bearer_token(&headers)?;
    let source = state.source(&token);

    match source.validate_token().await {
        Ok(user) => {
            info!("Authenticated as {}", user.login);
            Ok(Json(AuthResponse {
                user,
                demo: source.is_demo(),
            }))
        }
        Err(e) => {
            warn!("Token validation failed: {}", e);
            Err(ApiError::invalid_token())
        }
    }
}
