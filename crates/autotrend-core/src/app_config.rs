use std::path::PathBuf;

/// Immutable application configuration, built once at startup and passed
/// into each pipeline component at construction.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,

    /// Trends RSS feed URL.
    pub feed_url: String,
    pub feed_timeout_secs: u64,
    /// Items older than this many hours are dropped at fetch time.
    pub trend_cutoff_hours: i64,
    /// Trailing window during which a processed trend title is skipped.
    pub dedup_window_days: i64,
    /// Operator keyword list. `None` means the built-in defaults apply;
    /// a supplied list fully replaces them.
    pub filter_keywords: Option<Vec<String>>,
    pub max_posts_per_run: usize,

    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub ai_fallback_enabled: bool,
    pub generate_timeout_secs: u64,
    /// Custom article prompt template with `{trend_title}` placeholder.
    pub custom_prompt: Option<String>,

    pub pexels_api_key: Option<String>,
    pub enable_images: bool,
    pub enable_content_images: bool,
    pub image_orientation: String,
    pub image_search_timeout_secs: u64,
    pub image_download_timeout_secs: u64,
    /// Directory downloaded images are stored under.
    pub media_dir: PathBuf,

    pub enable_auto_faqs: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("feed_url", &self.feed_url)
            .field("feed_timeout_secs", &self.feed_timeout_secs)
            .field("trend_cutoff_hours", &self.trend_cutoff_hours)
            .field("dedup_window_days", &self.dedup_window_days)
            .field("filter_keywords", &self.filter_keywords)
            .field("max_posts_per_run", &self.max_posts_per_run)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_model", &self.openai_model)
            .field("ai_fallback_enabled", &self.ai_fallback_enabled)
            .field("generate_timeout_secs", &self.generate_timeout_secs)
            .field("custom_prompt", &self.custom_prompt)
            .field(
                "pexels_api_key",
                &self.pexels_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("enable_images", &self.enable_images)
            .field("enable_content_images", &self.enable_content_images)
            .field("image_orientation", &self.image_orientation)
            .field("image_search_timeout_secs", &self.image_search_timeout_secs)
            .field(
                "image_download_timeout_secs",
                &self.image_download_timeout_secs,
            )
            .field("media_dir", &self.media_dir)
            .field("enable_auto_faqs", &self.enable_auto_faqs)
            .finish()
    }
}
