//! Repository routes

use axum::{extract::State, http::HeaderMap, Json};
use common::models::Repository;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::{bearer_token, AppState};

pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Repository>>> {
    let token = bearer_token(&headers)?;
    let repos = state.source(&token).list_repos().await?;
    Ok(Json(repos))
}
