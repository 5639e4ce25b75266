//! Dashboard and PR detail loading

use chrono::{DateTime, Utc};
use common::models::{
    Comment, Commit, DateRange, PrAiMetrics, PrAnalytics, PullRequest, Review, TimeMetrics,
    UserMetrics,
};
use futures::stream::{self, StreamExt};
use github::ClientError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analytics::{self, ReviewMap};
use crate::source::DataSource;
use crate::store::MetricsStore;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("GitHub API error: {0}")]
    GitHub(#[from] ClientError),
}

/// Everything the dashboard shows for one repository and window
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub repository: String,
    pub range: DateRange,
    pub loaded_at: DateTime<Utc>,
    pub prs: Vec<PullRequest>,
    pub reviews: ReviewMap,
    pub analytics: PrAnalytics,
    pub users: Vec<UserMetrics>,
    /// PRs whose review fetch failed and were counted with no reviews
    pub review_failures: Vec<i32>,
}

impl Dashboard {
    pub fn reviews_for(&self, number: i32) -> &[Review] {
        self.reviews.get(&number).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn time_metrics_for(&self, pr: &PullRequest) -> TimeMetrics {
        analytics::time_metrics_at(pr, self.reviews_for(pr.number), self.loaded_at)
    }
}

/// Loads dashboards: PR pagination, then per-PR reviews with bounded concurrency
pub struct DashboardLoader<'a> {
    source: &'a DataSource,
    concurrency: usize,
}

impl<'a> DashboardLoader<'a> {
    pub fn new(source: &'a DataSource, concurrency: usize) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn load(
        &self,
        owner: &str,
        name: &str,
        range: DateRange,
    ) -> Result<Dashboard, LoadError> {
        self.load_at(owner, name, range, Utc::now()).await
    }

    /// Load with an explicit reference time for open-PR lifecycles
    pub async fn load_at(
        &self,
        owner: &str,
        name: &str,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> Result<Dashboard, LoadError> {
        info!(
            "Loading dashboard for {}/{} ({} to {})",
            owner, name, range.start, range.end
        );

        let prs = self.source.fetch_prs(owner, name, &range).await?;
        let (reviews, review_failures) = self.fetch_reviews(owner, name, &prs).await;

        let analytics = analytics::pr_analytics_at(&prs, &reviews, now);
        let users = analytics::user_metrics(&prs, &reviews);

        info!(
            "Dashboard loaded: {} PRs, {} reviewed, {} contributors",
            analytics.total_prs,
            analytics.reviewed_prs,
            users.len()
        );

        Ok(Dashboard {
            repository: format!("{}/{}", owner, name),
            range,
            loaded_at: now,
            prs,
            reviews,
            analytics,
            users,
            review_failures,
        })
    }

    /// Reviews for every PR. A failed fetch degrades that PR to no reviews.
    async fn fetch_reviews(
        &self,
        owner: &str,
        name: &str,
        prs: &[PullRequest],
    ) -> (ReviewMap, Vec<i32>) {
        let numbers: Vec<i32> = prs.iter().map(|pr| pr.number).collect();
        let results: Vec<(i32, Result<Vec<Review>, ClientError>)> = stream::iter(numbers)
            .map(|number| async move {
                (number, self.source.list_reviews(owner, name, number).await)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut reviews = ReviewMap::new();
        let mut failures = Vec::new();
        for (number, result) in results {
            match result {
                Ok(list) => {
                    debug!("PR #{}: {} reviews", number, list.len());
                    reviews.insert(number, list);
                }
                Err(e) => {
                    warn!("Error loading reviews for PR #{}: {}", number, e);
                    failures.push(number);
                    reviews.insert(number, Vec::new());
                }
            }
        }
        (reviews, failures)
    }
}

/// A single PR with its full activity
#[derive(Debug, Clone, Serialize)]
pub struct PrDetail {
    pub pr: PullRequest,
    /// Sorted by submission time, pending reviews last
    pub reviews: Vec<Review>,
    pub commits: Vec<Commit>,
    pub comments: Vec<Comment>,
    pub time_metrics: TimeMetrics,
    pub ai_metrics: Option<PrAiMetrics>,
    /// Set when the metrics store failed; the rest of the detail is still valid
    pub ai_metrics_error: Option<String>,
}

/// Load one PR's reviews, commits and comments concurrently, plus its AI record
pub async fn load_pr_detail(
    source: &DataSource,
    store: &MetricsStore,
    owner: &str,
    name: &str,
    number: i32,
) -> Result<PrDetail, LoadError> {
    let now = Utc::now();
    debug!("Loading detail for {}/{}#{}", owner, name, number);

    let (pr, mut reviews, commits, comments) = tokio::try_join!(
        source.get_pr(owner, name, number),
        source.list_reviews(owner, name, number),
        source.list_commits(owner, name, number),
        source.list_comments(owner, name, number),
    )?;

    reviews.sort_by_key(|r| (r.submitted_at.is_none(), r.submitted_at));
    let time_metrics = analytics::time_metrics_at(&pr, &reviews, now);

    let repository = format!("{}/{}", owner, name);
    let (ai_metrics, ai_metrics_error) = match store.pr_metrics(&repository, number).await {
        Ok(record) => (record, None),
        Err(e) => {
            warn!("Error loading AI metrics for {}#{}: {}", repository, number, e);
            (None, Some(e.to_string()))
        }
    };

    Ok(PrDetail {
        pr,
        reviews,
        commits,
        comments,
        time_metrics,
        ai_metrics,
        ai_metrics_error,
    })
}
