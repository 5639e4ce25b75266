//! Metrics store collaborator

use common::models::PrAiMetrics;
use common::{Error, Result};
use sqlx::PgPool;
use tracing::debug;

use crate::demo::demo_ai_metrics;

/// Where AI-assistance records are looked up
#[derive(Clone)]
pub enum MetricsStore {
    Postgres(PgPool),
    Demo,
    /// No database configured: every lookup is empty
    Disabled,
}

impl MetricsStore {
    /// The store to use for a request; demo sessions always read fixtures
    pub fn scoped(&self, demo: bool) -> MetricsStore {
        if demo {
            MetricsStore::Demo
        } else {
            self.clone()
        }
    }

    /// Latest record for a PR of `repository` ("owner/name"). `None` means no data.
    pub async fn pr_metrics(
        &self,
        repository: &str,
        pr_number: i32,
    ) -> Result<Option<PrAiMetrics>> {
        match self {
            MetricsStore::Postgres(pool) => db::ai_metrics::latest(pool, repository, pr_number)
                .await
                .map_err(|e| Error::Database(e.to_string())),
            MetricsStore::Demo => Ok(demo_ai_metrics(repository, pr_number)),
            MetricsStore::Disabled => {
                debug!("Metrics store disabled, no AI metrics for {}#{}", repository, pr_number);
                Ok(None)
            }
        }
    }
}
