//! Pull request detail routes

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use common::models::{Comment, Commit, PrAiMetrics, PullRequest, Review, TimeMetrics};
use processor::format::{
    productivity_badge, review_state_label, status_color, FormattedTimeMetrics,
};
use processor::{load_pr_detail, PrDetail};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiResult, OptionExt};
use crate::state::{bearer_token, AppState};

#[derive(Serialize)]
pub struct ReviewRow {
    #[serde(flatten)]
    pub review: Review,
    pub state_label: &'static str,
}

#[derive(Serialize)]
pub struct PrDetailResponse {
    pub pr: PullRequest,
    pub status: &'static str,
    pub status_color: &'static str,
    /// Sorted by submission time, pending reviews last
    pub reviews: Vec<ReviewRow>,
    pub commits: Vec<Commit>,
    pub comments: Vec<Comment>,
    pub time_metrics: TimeMetrics,
    pub formatted: FormattedTimeMetrics,
    pub ai_metrics: Option<PrAiMetrics>,
    pub ai_metrics_error: Option<String>,
    pub productivity_badge: Option<&'static str>,
}

impl From<PrDetail> for PrDetailResponse {
    fn from(detail: PrDetail) -> Self {
        let status = detail.pr.display_status();
        let reviews = detail
            .reviews
            .into_iter()
            .map(|review| ReviewRow {
                state_label: review_state_label(review.state),
                review,
            })
            .collect();

        Self {
            status,
            status_color: status_color(status).css(),
            reviews,
            commits: detail.commits,
            comments: detail.comments,
            formatted: FormattedTimeMetrics::from(&detail.time_metrics),
            time_metrics: detail.time_metrics,
            productivity_badge: detail
                .ai_metrics
                .as_ref()
                .map(|m| productivity_badge(m.productivity_score)),
            ai_metrics: detail.ai_metrics,
            ai_metrics_error: detail.ai_metrics_error,
            pr: detail.pr,
        }
    }
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((owner, name, number)): Path<(String, String, i32)>,
) -> ApiResult<Json<PrDetailResponse>> {
    let token = bearer_token(&headers)?;
    let source = state.source(&token);
    let store = state.store.scoped(source.is_demo());

    let detail = load_pr_detail(&source, &store, &owner, &name, number).await?;
    Ok(Json(detail.into()))
}

/// AI-assistance record for a PR, 404 when none exists
pub async fn ai_metrics(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((owner, name, number)): Path<(String, String, i32)>,
) -> ApiResult<Json<PrAiMetrics>> {
    let token = bearer_token(&headers)?;
    let store = state.store.scoped(state.source(&token).is_demo());
    let repository = format!("{}/{}", owner, name);

    let record = store
        .pr_metrics(&repository, number)
        .await?
        .not_found(format!("No AI metrics for {}#{}", repository, number))?;

    Ok(Json(record))
}
