//! AI-assistance metrics queries

use common::models::{normalize_tool_list, PrAiMetrics};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

fn from_row(row: &PgRow) -> Result<PrAiMetrics, sqlx::Error> {
    let tools: Option<serde_json::Value> = row.try_get("ia_tool_used")?;
    Ok(PrAiMetrics {
        id: row.try_get("id")?,
        repository: row.try_get("repository")?,
        pr_number: row.try_get("pr_number")?,
        ai_tools: tools.as_ref().map(normalize_tool_list).unwrap_or_default(),
        ai_usage_scenarios: row.try_get("ia_usage_scenarios")?,
        productivity_score: row.try_get("productivity_score")?,
        productivity_reason: row.try_get("productivity_reason")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Most recent record for a PR. `None` when the PR has no record.
///
/// Rows without `updated_at` sort after dated ones; ties fall back to the
/// highest id.
pub async fn latest(
    pool: &PgPool,
    repository: &str,
    pr_number: i32,
) -> Result<Option<PrAiMetrics>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, repository, pr_number, ia_tool_used, ia_usage_scenarios,
               productivity_score, productivity_reason, updated_at
        FROM pr_metrics_v2
        WHERE repository = $1 AND pr_number = $2
        ORDER BY updated_at DESC NULLS LAST, id DESC
        LIMIT 1
        "#,
    )
    .bind(repository)
    .bind(pr_number)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}
