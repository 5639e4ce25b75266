//! Review-cycle analytics
//!
//! Pure functions over fetched PRs and reviews. Every duration is in
//! fractional days.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use common::models::{
    days_between, PrAnalytics, PrState, PullRequest, Review, ReviewState, TimeMetrics,
    UserMetrics,
};

/// Reviews keyed by PR number
pub type ReviewMap = BTreeMap<i32, Vec<Review>>;

/// Arithmetic mean; 0 for an empty slice
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the strictly positive values only
fn positive_average(values: impl Iterator<Item = f64>) -> f64 {
    let kept: Vec<f64> = values.filter(|v| *v > 0.0).collect();
    average(&kept)
}

/// Earliest submitted review, ignoring pending ones
pub fn first_review_at(reviews: &[Review]) -> Option<DateTime<Utc>> {
    reviews
        .iter()
        .filter(|r| r.state != ReviewState::Pending)
        .filter_map(|r| r.submitted_at)
        .min()
}

/// Earliest approving review
pub fn first_approval_at(reviews: &[Review]) -> Option<DateTime<Utc>> {
    reviews
        .iter()
        .filter(|r| r.state == ReviewState::Approved)
        .filter_map(|r| r.submitted_at)
        .min()
}

/// Calculate per-PR timings, measuring open PRs up to the current time
pub fn time_metrics(pr: &PullRequest, reviews: &[Review]) -> TimeMetrics {
    time_metrics_at(pr, reviews, Utc::now())
}

/// Calculate per-PR timings, measuring open PRs up to `now`
pub fn time_metrics_at(pr: &PullRequest, reviews: &[Review], now: DateTime<Utc>) -> TimeMetrics {
    let end = pr.merged_at.or(pr.closed_at).unwrap_or(now);
    let first_review = first_review_at(reviews);
    let first_approval = first_approval_at(reviews);

    let creation_to_first_review = first_review
        .map(|at| days_between(pr.created_at, at))
        .unwrap_or(0.0);

    // Not reordered: an approval recorded before the first review yields a negative span.
    let first_review_to_approval = match (first_review, first_approval) {
        (Some(review), Some(approval)) => days_between(review, approval),
        _ => 0.0,
    };

    let approval_to_merge = match (first_approval, pr.merged_at) {
        (Some(approval), Some(merged)) => days_between(approval, merged),
        _ => 0.0,
    };

    TimeMetrics {
        creation_to_first_review,
        first_review_to_approval,
        approval_to_merge,
        total_time: days_between(pr.created_at, end),
    }
}

/// Repository-wide aggregates over one window
pub fn pr_analytics(prs: &[PullRequest], reviews: &ReviewMap) -> PrAnalytics {
    pr_analytics_at(prs, reviews, Utc::now())
}

pub fn pr_analytics_at(
    prs: &[PullRequest],
    reviews: &ReviewMap,
    now: DateTime<Utc>,
) -> PrAnalytics {
    let reviews_for = |pr: &PullRequest| reviews.get(&pr.number).map(Vec::as_slice).unwrap_or(&[]);

    let total_prs = prs.len();
    let open_prs = prs.iter().filter(|pr| pr.state == PrState::Open).count();
    let reviewed_prs = prs.iter().filter(|pr| !reviews_for(pr).is_empty()).count();

    let timings: Vec<TimeMetrics> = prs
        .iter()
        .map(|pr| time_metrics_at(pr, reviews_for(pr), now))
        .collect();

    let avg_time_to_first_review =
        positive_average(timings.iter().map(|t| t.creation_to_first_review));
    let avg_time_to_approval =
        positive_average(timings.iter().map(|t| t.first_review_to_approval));

    let development: Vec<f64> = prs
        .iter()
        .map(|pr| days_between(pr.created_at, pr.updated_at))
        .collect();

    PrAnalytics {
        total_prs,
        open_prs,
        reviewed_prs,
        pending_review_prs: total_prs - reviewed_prs,
        avg_time_to_first_review,
        avg_time_to_approval,
        avg_response_time: avg_time_to_approval,
        avg_development_time: average(&development),
        avg_life_cycle: positive_average(timings.iter().map(|t| t.total_time)),
    }
}

/// Per-contributor rollup, ranked by interactions (PRs authored + reviews given).
///
/// Ties keep first-encounter order: authors in PR order, then reviewers in
/// PR order.
pub fn user_metrics(prs: &[PullRequest], reviews: &ReviewMap) -> Vec<UserMetrics> {
    let mut users: Vec<UserMetrics> = Vec::new();
    let mut merged_counts: Vec<u32> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let mut slot =
        |users: &mut Vec<UserMetrics>, merged: &mut Vec<u32>, login: &str, avatar: &str| {
            *index.entry(login.to_string()).or_insert_with(|| {
                users.push(UserMetrics {
                    username: login.to_string(),
                    avatar_url: avatar.to_string(),
                    ..Default::default()
                });
                merged.push(0);
                users.len() - 1
            })
        };

    for pr in prs {
        let i = slot(&mut users, &mut merged_counts, &pr.user.login, &pr.user.avatar_url);
        let user = &mut users[i];
        user.total_prs += 1;
        user.lines_added += pr.additions;
        user.lines_removed += pr.deletions;
        user.total_interactions += 1;

        if let Some(merged_at) = pr.merged_at {
            merged_counts[i] += 1;
            let n = f64::from(merged_counts[i]);
            let time_to_merge = days_between(pr.created_at, merged_at);
            user.avg_time_to_merge += (time_to_merge - user.avg_time_to_merge) / n;
        }
    }

    let reviews_in_pr_order = prs
        .iter()
        .filter_map(|pr| reviews.get(&pr.number))
        .flatten();
    for review in reviews_in_pr_order {
        let i = slot(
            &mut users,
            &mut merged_counts,
            &review.user.login,
            &review.user.avatar_url,
        );
        users[i].reviews_given += 1;
        users[i].total_interactions += 1;
    }

    // Vec::sort_by is stable
    users.sort_by(|a, b| b.total_interactions.cmp(&a.total_interactions));
    users
}
