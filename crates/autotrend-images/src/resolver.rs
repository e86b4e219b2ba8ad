//! Turns an article's image suggestions into stored files and in-content
//! markup. Every image failure is recorded and skipped; image sourcing
//! never fails a post.

use autotrend_ai::{GeneratedArticle, ImageSuggestion, Placement};
use tracing::{debug, warn};

use crate::client::{PexelsClient, Photo};
use crate::media::{MediaStore, StoredImage};
use crate::query;

/// Outcome of resolving images for one article.
#[derive(Debug)]
pub struct ResolvedImages {
    /// URL of the featured image, set at most once.
    pub featured_url: Option<String>,
    /// Article content with any figures spliced in.
    pub content: String,
    /// Number of images downloaded and stored.
    pub attached: usize,
    /// Human-readable notes on skips and failures, for the run log.
    pub messages: Vec<String>,
}

pub struct ImageResolver {
    client: Option<PexelsClient>,
    store: MediaStore,
    enabled: bool,
    content_images: bool,
    orientation: String,
}

impl ImageResolver {
    pub fn new(
        client: Option<PexelsClient>,
        store: MediaStore,
        enabled: bool,
        content_images: bool,
        orientation: String,
    ) -> Self {
        Self {
            client,
            store,
            enabled,
            content_images,
            orientation,
        }
    }

    /// Resolve the article's suggested images.
    ///
    /// Walks suggestions in order, honoring at most one featured image.
    /// When no featured suggestion exists, one is synthesized from the
    /// title. Disabled or unconfigured resolvers return the content
    /// untouched without any network traffic.
    pub async fn resolve(&self, article: &GeneratedArticle) -> ResolvedImages {
        let mut result = ResolvedImages {
            featured_url: None,
            content: article.content.clone(),
            attached: 0,
            messages: Vec::new(),
        };

        if !self.enabled {
            result.messages.push("image sourcing disabled".to_string());
            return result;
        }
        let Some(client) = self.client.as_ref() else {
            result
                .messages
                .push("no image API key configured".to_string());
            return result;
        };

        for suggestion in &article.image_suggestions {
            match suggestion.placement {
                Placement::Featured => {
                    if result.featured_url.is_some() {
                        result
                            .messages
                            .push("extra featured image suggestion ignored".to_string());
                        continue;
                    }
                    match self.fetch_and_store(client, suggestion, &article.title).await {
                        Ok((_, stored)) => {
                            result.featured_url = Some(stored.url);
                            result.attached += 1;
                        }
                        Err(message) => result.messages.push(message),
                    }
                }
                Placement::Content => {
                    if !self.content_images {
                        result
                            .messages
                            .push("in-content images disabled".to_string());
                        continue;
                    }
                    match self.fetch_and_store(client, suggestion, &article.title).await {
                        Ok((photo, stored)) => {
                            let figure = build_figure(&stored, suggestion, &photo);
                            result.content = insert_figure(&result.content, &figure);
                            result.attached += 1;
                        }
                        Err(message) => result.messages.push(message),
                    }
                }
            }
        }

        if result.featured_url.is_none() {
            let synthesized = ImageSuggestion {
                placement: Placement::Featured,
                search_query: String::new(),
                alt_text: article.title.clone(),
                caption: None,
            };
            match self
                .fetch_and_store(client, &synthesized, &article.title)
                .await
            {
                Ok((_, stored)) => {
                    result.featured_url = Some(stored.url);
                    result.attached += 1;
                }
                Err(message) => result.messages.push(message),
            }
        }

        result
    }

    /// Try each query candidate in order and store the first photo found.
    /// The returned `Err` is a log message, not a hard failure.
    async fn fetch_and_store(
        &self,
        client: &PexelsClient,
        suggestion: &ImageSuggestion,
        title: &str,
    ) -> Result<(Photo, StoredImage), String> {
        let candidates = query::query_candidates(&suggestion.search_query, title);
        if candidates.is_empty() {
            return Err("no usable image query for suggestion".to_string());
        }

        let mut last_error = String::new();
        for candidate in &candidates {
            match client.best_image(candidate, &self.orientation).await {
                Ok(photo) => {
                    debug!(query = %candidate, photo_id = photo.id, "image found");
                    let alt = if suggestion.alt_text.trim().is_empty() {
                        title
                    } else {
                        &suggestion.alt_text
                    };
                    let bytes = client
                        .download(&photo.src.large)
                        .await
                        .map_err(|e| format!("image download failed: {e}"))?;
                    let stored = self
                        .store
                        .store_image(photo.id, alt, &bytes)
                        .await
                        .map_err(|e| format!("image store failed: {e}"))?;
                    return Ok((photo, stored));
                }
                Err(err) => {
                    warn!(query = %candidate, error = %err, "image query failed");
                    last_error = err.to_string();
                }
            }
        }
        Err(format!(
            "no image found for '{}': {last_error}",
            candidates[0]
        ))
    }
}

fn build_figure(stored: &StoredImage, suggestion: &ImageSuggestion, photo: &Photo) -> String {
    let caption = suggestion
        .caption
        .clone()
        .unwrap_or_else(|| format!("Photo by {} on Pexels", photo.photographer));
    let alt = if suggestion.alt_text.trim().is_empty() {
        &caption
    } else {
        &suggestion.alt_text
    };
    format!(
        "<figure><img src=\"{}\" alt=\"{}\" /><figcaption>{caption}</figcaption></figure>",
        stored.url, alt
    )
}

/// Splice a figure into HTML content: after the second paragraph when there
/// are three or more, after the first when there are exactly two, appended
/// otherwise.
#[must_use]
pub fn insert_figure(content: &str, figure: &str) -> String {
    let close = "</p>";
    let paragraph_count = content.matches(close).count();
    let insert_after = match paragraph_count {
        0 | 1 => return format!("{content}\n\n{figure}"),
        2 => 1,
        _ => 2,
    };

    let mut offset = 0;
    for _ in 0..insert_after {
        match content[offset..].find(close) {
            Some(pos) => offset += pos + close.len(),
            None => return format!("{content}\n\n{figure}"),
        }
    }
    format!(
        "{}\n\n{figure}{}",
        &content[..offset],
        &content[offset..]
    )
}
