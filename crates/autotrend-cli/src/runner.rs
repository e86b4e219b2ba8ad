//! Pipeline command handlers for the CLI.
//!
//! These are called from `main` after the database pool and config are
//! established. Per-trend failures are logged and skipped rather than
//! propagated so a single bad trend does not abort the full run.

use std::collections::HashSet;

use autotrend_ai::{AiError, GeminiClient, GeneratedArticle, Generator, OpenAiClient};
use autotrend_core::AppConfig;
use autotrend_db::NewPost;
use autotrend_feed::{filter_trends, Trend, TrendFeed};
use autotrend_images::{ImageResolver, MediaStore, PexelsClient, ResolvedImages};
use sqlx::PgPool;
use tracing::{error, info, warn};

/// What happened to one trend on the success path.
struct TrendReport {
    post_id: i64,
    message: String,
}

/// Build the primary/fallback generator from config. Gemini is required;
/// OpenAI is optional and only consulted when fallback is enabled.
pub(crate) fn build_generator(
    config: &AppConfig,
) -> anyhow::Result<Generator<GeminiClient, OpenAiClient>> {
    let gemini_key = config
        .gemini_api_key
        .as_deref()
        .ok_or(AiError::NoApiKey("Gemini"))?;
    let primary = GeminiClient::new(gemini_key, &config.gemini_model, config.generate_timeout_secs)?;

    let fallback = match config.openai_api_key.as_deref() {
        Some(key) => Some(OpenAiClient::new(
            key,
            &config.openai_model,
            config.generate_timeout_secs,
        )?),
        None => None,
    };

    Ok(Generator::new(
        primary,
        fallback,
        config.ai_fallback_enabled,
        config.custom_prompt.clone(),
    ))
}

fn build_resolver(config: &AppConfig) -> anyhow::Result<ImageResolver> {
    let client = match config.pexels_api_key.as_ref() {
        Some(key) => Some(
            PexelsClient::new(key.clone(), config.image_search_timeout_secs)?
                .download_timeout_secs(config.image_download_timeout_secs),
        ),
        None => None,
    };
    Ok(ImageResolver::new(
        client,
        MediaStore::new(config.media_dir.clone()),
        config.enable_images,
        config.enable_content_images,
        config.image_orientation.clone(),
    ))
}

/// Fetch current trends and drop the ones already processed or outside the
/// keyword filter.
async fn load_candidate_trends(
    pool: &PgPool,
    config: &AppConfig,
) -> anyhow::Result<Vec<Trend>> {
    let feed = TrendFeed::new(
        &config.feed_url,
        config.feed_timeout_secs,
        config.trend_cutoff_hours,
    )?;
    let trends = feed.fetch_trends().await?;
    info!(count = trends.len(), "fetched trends from feed");

    let recent: HashSet<String> = autotrend_db::recent_trend_titles(pool, config.dedup_window_days)
        .await?
        .into_iter()
        .collect();
    let keywords = autotrend_core::effective_keywords(config);
    let candidates = filter_trends(trends, &keywords, &recent);
    info!(count = candidates.len(), "trends remaining after filter");

    Ok(candidates)
}

/// Run the full pipeline: fetch, filter, generate, store, decorate.
///
/// When `dry_run` is `true` the function prints the trends that would be
/// processed and returns without generating anything.
///
/// # Errors
///
/// Returns an error if the feed cannot be fetched, the generator cannot be
/// built, or the database is unreachable. Per-trend generation failures
/// are logged and skipped, not propagated.
pub(crate) async fn run_generate(
    pool: &PgPool,
    config: &AppConfig,
    max_posts_override: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let candidates = load_candidate_trends(pool, config).await?;
    let max_posts = max_posts_override.unwrap_or(config.max_posts_per_run);

    if dry_run {
        let titles: Vec<&str> = candidates
            .iter()
            .take(max_posts)
            .map(|t| t.title.as_str())
            .collect();
        println!(
            "dry-run: would generate {} posts: [{}]",
            titles.len(),
            titles.join(", ")
        );
        return Ok(());
    }

    let generator = build_generator(config)?;
    let resolver = build_resolver(config)?;

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for trend in candidates.into_iter().take(max_posts) {
        info!(trend = %trend.title, "processing trend");
        match process_trend(pool, config, &generator, &resolver, &trend).await {
            Ok(report) => {
                succeeded += 1;
                autotrend_db::insert_generation_log(
                    pool,
                    &trend.id,
                    &trend.title,
                    "success",
                    Some(report.post_id),
                    &report.message,
                )
                .await?;
                println!("created post {} for '{}'", report.post_id, trend.title);
            }
            Err(err) => {
                failed += 1;
                error!(trend = %trend.title, error = %err, "trend processing failed");
                autotrend_db::insert_generation_log(
                    pool,
                    &trend.id,
                    &trend.title,
                    "failed",
                    None,
                    &err.to_string(),
                )
                .await?;
            }
        }
    }

    println!("run complete: {succeeded} posts created, {failed} failed");
    Ok(())
}

/// Generate and store one trend's article, then best-effort decorate it
/// with images and FAQs. Image and FAQ failures are recorded in the log
/// message but never fail the post.
async fn process_trend(
    pool: &PgPool,
    config: &AppConfig,
    generator: &Generator<GeminiClient, OpenAiClient>,
    resolver: &ImageResolver,
    trend: &Trend,
) -> anyhow::Result<TrendReport> {
    let article = generator.generate_article(trend).await?;
    validate_article(&article).map_err(|field| {
        anyhow::anyhow!("generated article has empty required field: {field}")
    })?;

    let post = autotrend_db::insert_post(
        pool,
        NewPost {
            trend_id: &trend.id,
            trend_title: &trend.title,
            title: &article.title,
            content: &article.content,
            excerpt: &article.excerpt,
            meta_description: &article.meta_description,
            focus_keyword: &article.focus_keyword,
            tags: &article.tags,
            provider: &article.provider.to_string(),
            structured: article.structured,
            seo_score: article.seo_score,
            readability_score: article.readability_score,
        },
    )
    .await?;

    let mut notes = vec![format!("generated via {}", article.provider)];
    if !article.structured {
        notes.push("salvaged from unstructured response".to_string());
    }

    let resolved = resolver.resolve(&article).await;
    apply_resolved_images(pool, post.id, &article.content, resolved, &mut notes).await;

    if config.enable_auto_faqs {
        match ensure_faqs(pool, config, generator, trend).await {
            Ok(0) => notes.push("FAQs skipped (recent set exists)".to_string()),
            Ok(n) => notes.push(format!("{n} FAQs created")),
            Err(err) => {
                warn!(trend = %trend.title, error = %err, "FAQ generation failed");
                notes.push(format!("FAQ generation failed: {err}"));
            }
        }
    }

    Ok(TrendReport {
        post_id: post.id,
        message: notes.join("; "),
    })
}

/// Write resolved image results back to an existing post. The post is the
/// success gate and image decoration is partial, so DB errors here become
/// log notes instead of failing the trend.
async fn apply_resolved_images(
    pool: &PgPool,
    post_id: i64,
    original_content: &str,
    resolved: ResolvedImages,
    notes: &mut Vec<String>,
) {
    if resolved.content != original_content {
        if let Err(err) = autotrend_db::update_post_content(pool, post_id, &resolved.content).await
        {
            warn!(post_id, error = %err, "content update failed");
            notes.push(format!("content update failed: {err}"));
        }
    }
    if let Some(url) = resolved.featured_url.as_deref() {
        if let Err(err) = autotrend_db::set_featured_image(pool, post_id, url).await {
            warn!(post_id, error = %err, "featured image update failed");
            notes.push(format!("featured image update failed: {err}"));
        }
    }
    if resolved.attached > 0 {
        notes.push(format!("{} images attached", resolved.attached));
    }
    notes.extend(resolved.messages);
}

/// Generate and store FAQs for a trend unless an active set from the dedup
/// window already exists. Returns the number of FAQs inserted.
async fn ensure_faqs(
    pool: &PgPool,
    config: &AppConfig,
    generator: &Generator<GeminiClient, OpenAiClient>,
    trend: &Trend,
) -> anyhow::Result<usize> {
    if autotrend_db::has_recent_active_faqs(pool, &trend.title, config.dedup_window_days).await? {
        return Ok(0);
    }

    let faqs = generator.generate_faqs(trend).await?;
    let mut inserted = 0usize;
    for faq in &faqs {
        let source_url = (!trend.source_url.is_empty()).then_some(trend.source_url.as_str());
        autotrend_db::insert_faq(pool, &trend.title, &faq.question, &faq.answer, source_url)
            .await?;
        inserted += 1;
    }
    Ok(inserted)
}

/// Generate FAQs for current trends without creating posts.
///
/// # Errors
///
/// Returns an error if the feed, generator, or database is unavailable.
/// Per-trend failures are logged and skipped.
pub(crate) async fn run_generate_faqs(
    pool: &PgPool,
    config: &AppConfig,
    max_trends: usize,
) -> anyhow::Result<()> {
    let candidates = load_candidate_trends(pool, config).await?;
    let generator = build_generator(config)?;

    let mut total = 0usize;
    for trend in candidates.iter().take(max_trends) {
        match ensure_faqs(pool, config, &generator, trend).await {
            Ok(0) => println!("'{}': recent FAQs exist, skipped", trend.title),
            Ok(n) => {
                total += n;
                println!("'{}': {n} FAQs created", trend.title);
            }
            Err(err) => {
                error!(trend = %trend.title, error = %err, "FAQ generation failed");
            }
        }
    }
    println!("{total} FAQs created");
    Ok(())
}

/// A stored post must never have an empty title, content, meta description,
/// or focus keyword, whichever provider or path produced it.
fn validate_article(article: &GeneratedArticle) -> Result<(), &'static str> {
    if article.title.trim().is_empty() {
        return Err("title");
    }
    if article.content.trim().is_empty() {
        return Err("content");
    }
    if article.meta_description.trim().is_empty() {
        return Err("meta_description");
    }
    if article.focus_keyword.trim().is_empty() {
        return Err("focus_keyword");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use autotrend_ai::Provider;

    use super::*;

    fn article() -> GeneratedArticle {
        GeneratedArticle {
            title: "A Title".to_string(),
            meta_description: "A meta description.".to_string(),
            focus_keyword: "keyword".to_string(),
            content: "<p>Body.</p>".to_string(),
            excerpt: String::new(),
            tags: vec![],
            image_suggestions: vec![],
            seo_score: 0,
            readability_score: 0,
            provider: Provider::Gemini,
            structured: true,
        }
    }

    #[test]
    fn complete_article_passes_validation() {
        assert!(validate_article(&article()).is_ok());
    }

    #[test]
    fn empty_content_is_always_rejected() {
        let mut bad = article();
        bad.content = "   ".to_string();
        assert_eq!(validate_article(&bad), Err("content"));
    }

    #[test]
    fn empty_focus_keyword_is_rejected() {
        let mut bad = article();
        bad.focus_keyword = String::new();
        assert_eq!(validate_article(&bad), Err("focus_keyword"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn image_update_failures_become_notes(pool: PgPool) {
        let resolved = ResolvedImages {
            featured_url: Some("/media/rally-1.jpg".to_string()),
            content: "<p>Body.</p>\n<figure></figure>".to_string(),
            attached: 1,
            messages: vec![],
        };
        let mut notes = Vec::new();

        // No post row exists, so both writes fail; the run still records
        // the trend as succeeded with the failures noted.
        apply_resolved_images(&pool, 9999, "<p>Body.</p>", resolved, &mut notes).await;

        assert!(notes.iter().any(|n| n.starts_with("content update failed")));
        assert!(notes
            .iter()
            .any(|n| n.starts_with("featured image update failed")));
        assert!(notes.contains(&"1 images attached".to_string()));
    }
}
