//! Database operations for the `posts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub public_id: Uuid,
    pub trend_id: String,
    pub trend_title: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub meta_description: String,
    pub focus_keyword: String,
    pub tags: Vec<String>,
    pub featured_image_url: Option<String>,
    pub provider: String,
    pub structured: bool,
    pub seo_score: i32,
    pub readability_score: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a new draft post.
#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    pub trend_id: &'a str,
    pub trend_title: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub excerpt: &'a str,
    pub meta_description: &'a str,
    pub focus_keyword: &'a str,
    pub tags: &'a [String],
    pub provider: &'a str,
    pub structured: bool,
    pub seo_score: i32,
    pub readability_score: i32,
}

const POST_COLUMNS: &str = "id, public_id, trend_id, trend_title, title, content, excerpt, \
     meta_description, focus_keyword, tags, featured_image_url, provider, structured, \
     seo_score, readability_score, status, created_at, updated_at";

/// Inserts a new post in `draft` status.
///
/// Generates a UUID in Rust and binds it to `public_id`. Returns the full
/// newly-created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_post(pool: &PgPool, post: NewPost<'_>) -> Result<PostRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, PostRow>(&format!(
        "INSERT INTO posts (public_id, trend_id, trend_title, title, content, excerpt, \
             meta_description, focus_keyword, tags, provider, structured, \
             seo_score, readability_score, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'draft') \
         RETURNING {POST_COLUMNS}"
    ))
    .bind(public_id)
    .bind(post.trend_id)
    .bind(post.trend_title)
    .bind(post.title)
    .bind(post.content)
    .bind(post.excerpt)
    .bind(post.meta_description)
    .bind(post.focus_keyword)
    .bind(post.tags)
    .bind(post.provider)
    .bind(post.structured)
    .bind(post.seo_score)
    .bind(post.readability_score)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Replaces a post's content, typically after images were spliced in.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_post_content(pool: &PgPool, id: i64, content: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE posts SET content = $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(content)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Sets a post's featured image URL.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_featured_image(pool: &PgPool, id: i64, url: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE posts SET featured_image_url = $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(url)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Returns the most recent `limit` posts, ordered by `created_at DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts(pool: &PgPool, limit: i64) -> Result<Vec<PostRow>, DbError> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
