//! Database operations for the `generation_logs` table.
//!
//! One row per trend attempt. Besides auditing, the log doubles as the
//! dedup history: a trend title seen here within the window is not
//! generated again.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `generation_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenerationLogRow {
    pub id: i64,
    pub trend_id: String,
    pub trend_title: String,
    pub status: String,
    pub post_id: Option<i64>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

const LOG_COLUMNS: &str = "id, trend_id, trend_title, status, post_id, message, created_at";

/// Records the outcome of one trend attempt. `status` is `success` or
/// `failed`; `post_id` links the created post when there is one.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_generation_log(
    pool: &PgPool,
    trend_id: &str,
    trend_title: &str,
    status: &str,
    post_id: Option<i64>,
    message: &str,
) -> Result<GenerationLogRow, DbError> {
    let row = sqlx::query_as::<_, GenerationLogRow>(&format!(
        "INSERT INTO generation_logs (trend_id, trend_title, status, post_id, message) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {LOG_COLUMNS}"
    ))
    .bind(trend_id)
    .bind(trend_title)
    .bind(status)
    .bind(post_id)
    .bind(message)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Titles of all trends attempted within the last `window_days` days,
/// regardless of outcome. Matched exactly against incoming trend titles.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn recent_trend_titles(pool: &PgPool, window_days: i64) -> Result<Vec<String>, DbError> {
    let titles: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT trend_title FROM generation_logs \
         WHERE created_at > NOW() - ($1 || ' days')::interval",
    )
    .bind(window_days.to_string())
    .fetch_all(pool)
    .await?;

    Ok(titles)
}

/// Returns one page of log rows, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_generation_logs(
    pool: &PgPool,
    page: i64,
    per_page: i64,
) -> Result<Vec<GenerationLogRow>, DbError> {
    let offset = (page.max(1) - 1) * per_page;
    let rows = sqlx::query_as::<_, GenerationLogRow>(&format!(
        "SELECT {LOG_COLUMNS} FROM generation_logs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1 OFFSET $2"
    ))
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
