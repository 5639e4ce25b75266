//! Display helpers for dashboard payloads

use common::models::{PrAnalytics, ReviewState, TimeMetrics};
use serde::Serialize;

/// Render a day count: whole hours below one day, otherwise one-decimal days
pub fn format_days(days: f64) -> String {
    if days < 1.0 {
        let hours = (days * 24.0).round() as i64;
        return format!("{}h", hours);
    }
    format!("{}d", round1(days))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Color token for a PR status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Red,
    Purple,
    Neutral,
}

impl StatusColor {
    pub fn css(self) -> &'static str {
        match self {
            StatusColor::Green => "hsl(var(--github-green))",
            StatusColor::Red => "hsl(var(--github-red))",
            StatusColor::Purple => "hsl(var(--github-purple))",
            StatusColor::Neutral => "hsl(var(--muted-foreground))",
        }
    }
}

/// Map a status label (English or Portuguese, any case) to its color
pub fn status_color(status: &str) -> StatusColor {
    match status.to_lowercase().as_str() {
        "open" | "aberto" => StatusColor::Green,
        "closed" | "fechado" => StatusColor::Red,
        "merged" | "mergeado" => StatusColor::Purple,
        _ => StatusColor::Neutral,
    }
}

/// Badge color for an AI productivity score on a 0-100 scale
pub fn productivity_badge(score: Option<i32>) -> &'static str {
    match score {
        None => "gray",
        Some(s) if s >= 80 => "green",
        Some(s) if s >= 60 => "yellow",
        Some(s) if s >= 40 => "orange",
        Some(_) => "red",
    }
}

pub fn review_state_label(state: ReviewState) -> &'static str {
    match state {
        ReviewState::Approved => "Approved",
        ReviewState::ChangesRequested => "Changes requested",
        ReviewState::Commented => "Commented",
        ReviewState::Pending => "Pending",
        ReviewState::Dismissed => "Dismissed",
        ReviewState::Unknown => "Unknown",
    }
}

/// Human-readable durations for one PR
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedTimeMetrics {
    pub creation_to_first_review: String,
    pub first_review_to_approval: String,
    pub approval_to_merge: String,
    pub total_time: String,
}

impl From<&TimeMetrics> for FormattedTimeMetrics {
    fn from(tm: &TimeMetrics) -> Self {
        Self {
            creation_to_first_review: format_days(tm.creation_to_first_review),
            first_review_to_approval: format_days(tm.first_review_to_approval),
            approval_to_merge: format_days(tm.approval_to_merge),
            total_time: format_days(tm.total_time),
        }
    }
}

/// Human-readable averages for the summary cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedAnalytics {
    pub avg_time_to_first_review: String,
    pub avg_time_to_approval: String,
    pub avg_response_time: String,
    pub avg_development_time: String,
    pub avg_life_cycle: String,
}

impl From<&PrAnalytics> for FormattedAnalytics {
    fn from(a: &PrAnalytics) -> Self {
        Self {
            avg_time_to_first_review: format_days(a.avg_time_to_first_review),
            avg_time_to_approval: format_days(a.avg_time_to_approval),
            avg_response_time: format_days(a.avg_response_time),
            avg_development_time: format_days(a.avg_development_time),
            avg_life_cycle: format_days(a.avg_life_cycle),
        }
    }
}

/// One bar of the review-cycle chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: &'static str,
    pub value: f64,
    pub color: &'static str,
}

/// Stage bars for the dashboard chart. The merge stage is whatever the
/// life cycle leaves after the review and approval stages.
pub fn chart_series(a: &PrAnalytics) -> Vec<ChartPoint> {
    vec![
        ChartPoint {
            name: "Opened → first review",
            value: round1(a.avg_time_to_first_review),
            color: "#22c55e",
        },
        ChartPoint {
            name: "First review → approval",
            value: round1(a.avg_time_to_approval),
            color: "#3b82f6",
        },
        ChartPoint {
            name: "Approval → merge",
            value: round1(a.avg_life_cycle - a.avg_time_to_approval - a.avg_time_to_first_review),
            color: "#8b5cf6",
        },
        ChartPoint {
            name: "Total",
            value: round1(a.avg_life_cycle),
            color: "#f59e0b",
        },
    ]
}
