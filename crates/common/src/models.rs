//! Domain models
//!
//! Snapshots fetched from GitHub deserialize straight from the REST payloads.
//! Derived metrics are plain values recomputed on every load.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Treat an explicit JSON `null` the same as a missing field
fn null_to_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The authenticated GitHub user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub login: String,
    pub id: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub avatar_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Author or reviewer identity embedded in other payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Actor {
    pub login: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoOwner {
    pub login: String,
}

/// A repository visible to the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub color: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
}

/// A pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequest {
    pub id: i64,
    pub number: i32,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    pub state: PrState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub user: Actor,
    #[serde(default, deserialize_with = "null_to_default")]
    pub labels: Vec<Label>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub assignees: Vec<Actor>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub requested_reviewers: Vec<Actor>,
    // The list endpoint omits the size fields; only the single-PR endpoint has them.
    #[serde(default)]
    pub additions: i64,
    #[serde(default)]
    pub deletions: i64,
    #[serde(default)]
    pub commits: i64,
    #[serde(default)]
    pub draft: bool,
}

impl PullRequest {
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    /// Display status: merged PRs are reported separately from closed ones
    pub fn display_status(&self) -> &'static str {
        if self.is_merged() {
            "merged"
        } else if self.state == PrState::Closed {
            "closed"
        } else {
            "open"
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Pending,
    Dismissed,
    #[serde(other)]
    Unknown,
}

/// A PR review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub user: Actor,
    #[serde(default, deserialize_with = "null_to_default")]
    pub body: String,
    pub state: ReviewState,
    /// Pending reviews have not been submitted yet
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pull_request_url: String,
}

/// A commit on a PR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub authored_at: DateTime<Utc>,
    /// Linked GitHub account, absent when the commit email is unknown to GitHub
    pub author: Option<Actor>,
}

/// An issue comment on a PR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub user: Actor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inclusive creation-date window for a dashboard load
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days` days leading up to `now`. Fails when the start would fall
    /// outside the representable calendar.
    pub fn last_days(days: i64, now: DateTime<Utc>) -> Result<Self> {
        let start = Duration::try_days(days)
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| Error::InvalidRange(format!("{} days is out of range", days)))?;
        Self::new(start, now)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// Span length in whole days, rounded up
    pub fn days(&self) -> i64 {
        let ms = (self.end - self.start).num_milliseconds();
        (ms + MS_PER_DAY - 1).div_euclid(MS_PER_DAY)
    }
}

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Elapsed time between two instants, in fractional days
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_DAY as f64
}

/// Per-PR review-cycle durations, in days
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct TimeMetrics {
    pub creation_to_first_review: f64,
    pub first_review_to_approval: f64,
    pub approval_to_merge: f64,
    pub total_time: f64,
}

/// Repository-wide aggregates for one date window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PrAnalytics {
    pub total_prs: usize,
    pub open_prs: usize,
    pub reviewed_prs: usize,
    pub pending_review_prs: usize,
    pub avg_time_to_first_review: f64,
    pub avg_time_to_approval: f64,
    pub avg_response_time: f64,
    pub avg_development_time: f64,
    pub avg_life_cycle: f64,
}

/// Per-contributor rollup across authored PRs and reviews given
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserMetrics {
    pub username: String,
    pub avatar_url: String,
    pub total_prs: u32,
    pub lines_added: i64,
    pub lines_removed: i64,
    pub total_interactions: u32,
    pub avg_response_time: f64,
    pub avg_time_to_merge: f64,
    pub reviews_given: u32,
    pub comments_given: u32,
}

/// AI-assistance record attached to a PR in the metrics store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrAiMetrics {
    #[serde(default)]
    pub id: i64,
    pub repository: String,
    pub pr_number: i32,
    #[serde(
        default,
        alias = "ia_tool_used",
        deserialize_with = "deserialize_tool_list"
    )]
    pub ai_tools: Vec<String>,
    #[serde(default, alias = "ia_usage_scenarios")]
    pub ai_usage_scenarios: Option<String>,
    #[serde(default)]
    pub productivity_score: Option<i32>,
    #[serde(default)]
    pub productivity_reason: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Split a comma-separated tool list, dropping blanks
pub fn split_tool_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tool| !tool.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize the stored tool field, which may be a delimited string, an array, or null
pub fn normalize_tool_list(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => split_tool_list(s),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|tool| !tool.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn deserialize_tool_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(normalize_tool_list).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_pr_from_list_payload() {
        let pr: PullRequest = serde_json::from_value(json!({
            "id": 10,
            "number": 7,
            "title": "Fix parser",
            "body": null,
            "html_url": "https://github.com/o/r/pull/7",
            "state": "closed",
            "created_at": "2026-01-01T10:00:00Z",
            "updated_at": "2026-01-02T10:00:00Z",
            "closed_at": "2026-01-02T10:00:00Z",
            "merged_at": "2026-01-02T10:00:00Z",
            "user": {"login": "alice", "avatar_url": "https://a"},
            "labels": [{"name": "bug", "color": "d73a4a"}],
            "requested_reviewers": [],
            "draft": false
        }))
        .unwrap();

        assert_eq!(pr.number, 7);
        assert_eq!(pr.state, PrState::Closed);
        assert_eq!(pr.additions, 0);
        assert_eq!(pr.display_status(), "merged");
        assert_eq!(pr.labels[0].name, "bug");
    }

    #[test]
    fn test_ghost_user_on_review() {
        let review: Review = serde_json::from_value(json!({
            "id": 1,
            "user": null,
            "body": null,
            "state": "COMMENTED",
            "submitted_at": "2026-01-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(review.user, Actor::default());
        assert_eq!(review.body, "");
    }

    #[test]
    fn test_unknown_review_state() {
        let review: Review = serde_json::from_value(json!({
            "id": 1,
            "user": {"login": "bob"},
            "state": "SOMETHING_NEW"
        }))
        .unwrap();

        assert_eq!(review.state, ReviewState::Unknown);
        assert!(review.submitted_at.is_none());
    }

    #[test]
    fn test_tool_list_from_string() {
        assert_eq!(
            split_tool_list("GitHub Copilot, ChatGPT ,,"),
            vec!["GitHub Copilot", "ChatGPT"]
        );
    }

    #[test]
    fn test_tool_list_shapes() {
        assert_eq!(
            normalize_tool_list(&json!(["Copilot", " ", "Cursor "])),
            vec!["Copilot", "Cursor"]
        );
        assert!(normalize_tool_list(&json!(null)).is_empty());
        assert!(normalize_tool_list(&json!(42)).is_empty());
    }

    #[test]
    fn test_ai_metrics_payload_aliases() {
        let record: PrAiMetrics = serde_json::from_value(json!({
            "id": 3,
            "repository": "o/r",
            "pr_number": 5,
            "ia_tool_used": "Copilot, ChatGPT",
            "ia_usage_scenarios": "tests",
            "productivity_score": 80,
            "productivity_reason": null
        }))
        .unwrap();

        assert_eq!(record.ai_tools, vec!["Copilot", "ChatGPT"]);
        assert_eq!(record.ai_usage_scenarios.as_deref(), Some("tests"));

        let missing: PrAiMetrics = serde_json::from_value(json!({
            "repository": "o/r",
            "pr_number": 5
        }))
        .unwrap();
        assert!(missing.ai_tools.is_empty());
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        let a = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        assert!(DateRange::new(b, a).is_err());
        assert!(DateRange::new(a, b).is_ok());
    }

    #[test]
    fn test_date_range_days_rounds_up() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 8, 1, 0, 0).unwrap();
        let range = DateRange::new(start, end).unwrap();
        assert_eq!(range.days(), 8);
        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(end + Duration::seconds(1)));
    }

    #[test]
    fn test_last_days() {
        let now = Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap();
        let range = DateRange::last_days(30, now).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end, now);

        assert!(matches!(
            DateRange::last_days(100_000_000, now),
            Err(Error::InvalidRange(_))
        ));
        assert!(DateRange::last_days(i64::MAX, now).is_err());
        assert!(DateRange::last_days(-1, now).is_err());
    }

    #[test]
    fn test_days_between() {
        let a = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 2, 12, 0, 0).unwrap();
        assert!((days_between(a, b) - 1.5).abs() < 1e-9);
    }
}
