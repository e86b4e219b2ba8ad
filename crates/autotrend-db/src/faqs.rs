//! Database operations for the `faqs` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `faqs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FaqRow {
    pub id: i64,
    pub trend_title: String,
    pub question: String,
    pub answer: String,
    pub source_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const FAQ_COLUMNS: &str =
    "id, trend_title, question, answer, source_url, status, created_at, updated_at";

/// Inserts an FAQ pair in `active` status. Returns the new row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_faq(
    pool: &PgPool,
    trend_title: &str,
    question: &str,
    answer: &str,
    source_url: Option<&str>,
) -> Result<FaqRow, DbError> {
    let row = sqlx::query_as::<_, FaqRow>(&format!(
        "INSERT INTO faqs (trend_title, question, answer, source_url, status) \
         VALUES ($1, $2, $3, $4, 'active') \
         RETURNING {FAQ_COLUMNS}"
    ))
    .bind(trend_title)
    .bind(question)
    .bind(answer)
    .bind(source_url)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Whether any active FAQ for this trend title was created within the last
/// `window_days` days. Used to skip regenerating FAQs for a repeat trend.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn has_recent_active_faqs(
    pool: &PgPool,
    trend_title: &str,
    window_days: i64,
) -> Result<bool, DbError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM faqs \
         WHERE trend_title = $1 \
           AND status = 'active' \
           AND created_at > NOW() - ($2 || ' days')::interval",
    )
    .bind(trend_title)
    .bind(window_days.to_string())
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Returns one page of FAQs, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_faqs(pool: &PgPool, page: i64, per_page: i64) -> Result<Vec<FaqRow>, DbError> {
    let offset = (page.max(1) - 1) * per_page;
    let rows = sqlx::query_as::<_, FaqRow>(&format!(
        "SELECT {FAQ_COLUMNS} FROM faqs \
         WHERE status = 'active' \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1 OFFSET $2"
    ))
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Counts active FAQs.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_faqs(pool: &PgPool) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM faqs WHERE status = 'active'")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Soft-deletes an FAQ by flipping its status to `deleted`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no active row exists with the given
/// `id`, or [`DbError::Sqlx`] if the update fails.
pub async fn soft_delete_faq(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE faqs SET status = 'deleted', updated_at = NOW() \
         WHERE id = $1 AND status = 'active'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
