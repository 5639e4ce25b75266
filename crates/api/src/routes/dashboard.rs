//! Dashboard routes

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use common::models::{Actor, DateRange, Label, PrAnalytics, TimeMetrics, UserMetrics};
use processor::format::{
    chart_series, status_color, ChartPoint, FormattedAnalytics, FormattedTimeMetrics,
};
use processor::{Dashboard, DashboardLoader};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult, OptionExt};
use crate::state::{bearer_token, AppState};

#[derive(Deserialize, Default)]
pub struct RangeQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Window length ending at `end` (or now); ignored when `start` is given
    pub days: Option<i64>,
}

impl RangeQuery {
    pub fn resolve(&self, default_days: i64, now: DateTime<Utc>) -> ApiResult<DateRange> {
        if let Some(start) = self.start {
            let end = self.end.unwrap_or(now);
            return Ok(DateRange::new(start, end)?);
        }
        let days = self.days.unwrap_or(default_days);
        if days <= 0 {
            return Err(ApiError::BadRequest(format!(
                "days must be positive, got {}",
                days
            )));
        }
        Ok(DateRange::last_days(days, self.end.unwrap_or(now))?)
    }
}

/// One row of the PR table
#[derive(Serialize)]
pub struct PrRow {
    pub number: i32,
    pub title: String,
    pub html_url: String,
    pub author: Actor,
    pub status: &'static str,
    pub status_color: &'static str,
    pub draft: bool,
    pub labels: Vec<Label>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub additions: i64,
    pub deletions: i64,
    pub review_count: usize,
    pub time_metrics: TimeMetrics,
    pub formatted: FormattedTimeMetrics,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub repository: String,
    pub range: DateRange,
    pub range_days: i64,
    pub loaded_at: DateTime<Utc>,
    pub analytics: PrAnalytics,
    pub formatted: FormattedAnalytics,
    pub chart: Vec<ChartPoint>,
    pub prs: Vec<PrRow>,
    pub users: Vec<UserMetrics>,
    pub review_failures: Vec<i32>,
    pub generation: u64,
    pub committed: bool,
}

fn build_response(dashboard: &Dashboard, generation: u64, committed: bool) -> DashboardResponse {
    let prs = dashboard
        .prs
        .iter()
        .map(|pr| {
            let time_metrics = dashboard.time_metrics_for(pr);
            let status = pr.display_status();
            PrRow {
                number: pr.number,
                title: pr.title.clone(),
                html_url: pr.html_url.clone(),
                author: pr.user.clone(),
                status,
                status_color: status_color(status).css(),
                draft: pr.draft,
                labels: pr.labels.clone(),
                created_at: pr.created_at,
                merged_at: pr.merged_at,
                closed_at: pr.closed_at,
                additions: pr.additions,
                deletions: pr.deletions,
                review_count: dashboard.reviews_for(pr.number).len(),
                formatted: FormattedTimeMetrics::from(&time_metrics),
                time_metrics,
            }
        })
        .collect();

    DashboardResponse {
        repository: dashboard.repository.clone(),
        range: dashboard.range,
        range_days: dashboard.range.days(),
        loaded_at: dashboard.loaded_at,
        analytics: dashboard.analytics,
        formatted: FormattedAnalytics::from(&dashboard.analytics),
        chart: chart_series(&dashboard.analytics),
        prs,
        users: dashboard.users.clone(),
        review_failures: dashboard.review_failures.clone(),
        generation,
        committed,
    }
}

/// Load a repository's dashboard and make it the caller's current one
pub async fn load(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((owner, name)): Path<(String, String)>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<DashboardResponse>> {
    let token = bearer_token(&headers)?;
    let range = query.resolve(state.config.default_range_days, Utc::now())?;

    let (session, ticket) = state.sessions.begin(&token).await;

    let source = state.source(&token);
    let dashboard = match DashboardLoader::new(&source, state.config.review_concurrency)
        .load(&owner, &name, range)
        .await
    {
        Ok(dashboard) => dashboard,
        Err(e) => {
            state.sessions.abandon(&token, ticket).await;
            return Err(e.into());
        }
    };

    // Build from the fresh load even when a newer one has superseded it
    let mut response = build_response(&dashboard, ticket.generation(), false);
    response.committed = session.commit(ticket, dashboard).await;
    if !response.committed {
        info!(
            "Dashboard for {}/{} superseded by a newer load",
            owner, name
        );
    }

    Ok(Json(response))
}

/// The caller's last committed dashboard
pub async fn current(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<DashboardResponse>> {
    let token = bearer_token(&headers)?;
    let session = state
        .sessions
        .get(&token)
        .await
        .not_found("No dashboard loaded yet")?;
    let committed = session
        .current()
        .await
        .not_found("No dashboard loaded yet")?;

    Ok(Json(build_response(
        &committed.dashboard,
        committed.generation,
        true,
    )))
}
