//! Provider orchestration: primary generation with optional fallback, and
//! the degraded unstructured path when a response carries no JSON.

use autotrend_feed::Trend;
use tracing::{info, warn};

use crate::extract;
use crate::normalize;
use crate::prompt;
use crate::provider::ContentProvider;
use crate::seo;
use crate::types::{FaqPair, GeneratedArticle, Provider};
use crate::AiError;

/// Drives article and FAQ generation across a primary provider and an
/// optional fallback. The fallback is consulted only when it is both
/// configured and enabled; otherwise primary errors surface verbatim.
pub struct Generator<P, F> {
    primary: P,
    fallback: Option<F>,
    fallback_enabled: bool,
    custom_prompt: Option<String>,
}

impl<P: ContentProvider, F: ContentProvider> Generator<P, F> {
    pub fn new(
        primary: P,
        fallback: Option<F>,
        fallback_enabled: bool,
        custom_prompt: Option<String>,
    ) -> Self {
        Self {
            primary,
            fallback,
            fallback_enabled,
            custom_prompt,
        }
    }

    fn fallback_in_play(&self) -> bool {
        self.fallback_enabled && self.fallback.is_some()
    }

    /// Generate a structured article for a trend.
    ///
    /// # Errors
    ///
    /// Returns the primary provider's error verbatim when no fallback is
    /// in play, or [`AiError::BothProvidersFailed`] when both sides fail.
    pub async fn generate_article(&self, trend: &Trend) -> Result<GeneratedArticle, AiError> {
        let prompt = prompt::build_article_prompt(trend, self.custom_prompt.as_deref());
        let degrade_on_primary = !self.fallback_in_play();

        match attempt_article(&self.primary, &prompt, trend, degrade_on_primary).await {
            Ok(article) => Ok(article),
            Err(primary_err) => {
                let Some(fallback) = self.fallback.as_ref().filter(|_| self.fallback_enabled)
                else {
                    return Err(primary_err);
                };
                warn!(
                    provider = %self.primary.provider(),
                    error = %primary_err,
                    "primary provider failed, trying fallback"
                );
                match attempt_article(fallback, &prompt, trend, true).await {
                    Ok(article) => {
                        info!(provider = %fallback.provider(), "fallback provider succeeded");
                        Ok(article)
                    }
                    Err(fallback_err) => Err(AiError::BothProvidersFailed {
                        primary: primary_err.to_string(),
                        fallback: fallback_err.to_string(),
                    }),
                }
            }
        }
    }

    /// Generate FAQ pairs for a trend. Parsing never hard-fails (the
    /// heuristic splitter absorbs unstructured output), so errors here are
    /// transport or provider errors only.
    pub async fn generate_faqs(&self, trend: &Trend) -> Result<Vec<FaqPair>, AiError> {
        let prompt = prompt::build_faq_prompt(trend);

        match self.primary.generate_text(&prompt).await {
            Ok(text) => Ok(extract::parse_faqs(&text)),
            Err(primary_err) => {
                let Some(fallback) = self.fallback.as_ref().filter(|_| self.fallback_enabled)
                else {
                    return Err(primary_err);
                };
                warn!(
                    provider = %self.primary.provider(),
                    error = %primary_err,
                    "primary provider failed for FAQs, trying fallback"
                );
                match fallback.generate_text(&prompt).await {
                    Ok(text) => Ok(extract::parse_faqs(&text)),
                    Err(fallback_err) => Err(AiError::BothProvidersFailed {
                        primary: primary_err.to_string(),
                        fallback: fallback_err.to_string(),
                    }),
                }
            }
        }
    }
}

async fn attempt_article<P: ContentProvider>(
    provider: &P,
    prompt: &str,
    trend: &Trend,
    degrade: bool,
) -> Result<GeneratedArticle, AiError> {
    let text = provider.generate_text(prompt).await?;
    match extract::parse_article(&text, provider.provider()) {
        Ok(article) => Ok(article),
        Err(AiError::NoJsonFound { raw }) if degrade => {
            warn!(
                provider = %provider.provider(),
                "no JSON in response, salvaging as unstructured article"
            );
            Ok(degraded_article(&raw, provider.provider(), trend))
        }
        Err(err) => Err(err),
    }
}

/// Build an article from plain prose when a provider ignored the JSON
/// instructions and no fallback remains. Metadata comes from the SEO
/// heuristics and the article is flagged unstructured.
fn degraded_article(raw: &str, provider: Provider, trend: &Trend) -> GeneratedArticle {
    let (mut tags, remainder) = normalize::split_trailing_tags(raw);
    if tags.is_empty() {
        tags = trend
            .related_topics
            .iter()
            .map(|t| t.to_lowercase())
            .collect();
    }
    let (line_title, body) = normalize::split_title(&remainder);
    let content = normalize::markdown_to_html(&body);

    let title = line_title
        .or_else(|| normalize::first_h1(&content))
        .map(|t| normalize::strip_trailing_tag_list(&t))
        .unwrap_or_else(|| trend.title.clone());
    let focus_keyword = seo::extract_focus_keyword(&title);
    let title = seo::optimize_title(&title, &focus_keyword);

    let meta_description = normalize::derive_meta_description(&content)
        .unwrap_or_else(|| normalize::synthesize_excerpt(&content));
    let excerpt = normalize::synthesize_excerpt(&content);

    let mut article = GeneratedArticle {
        title,
        meta_description,
        focus_keyword,
        content,
        excerpt,
        tags,
        image_suggestions: Vec::new(),
        seo_score: 0,
        readability_score: 0,
        provider,
        structured: false,
    };
    article.seo_score = seo::compute_seo_score(&article);
    article
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use chrono::Utc;

    use super::*;

    struct MockProvider {
        kind: Provider,
        outcome: Result<String, String>,
    }

    impl MockProvider {
        fn ok(kind: Provider, text: &str) -> Self {
            Self {
                kind,
                outcome: Ok(text.to_string()),
            }
        }

        fn failing(kind: Provider, body: &str) -> Self {
            Self {
                kind,
                outcome: Err(body.to_string()),
            }
        }
    }

    impl ContentProvider for MockProvider {
        fn provider(&self) -> Provider {
            self.kind
        }

        fn generate_text(
            &self,
            _prompt: &str,
        ) -> impl Future<Output = Result<String, AiError>> + Send {
            let out = match &self.outcome {
                Ok(text) => Ok(text.clone()),
                Err(body) => Err(AiError::Api {
                    provider: "mock",
                    status: 500,
                    body: body.clone(),
                }),
            };
            async move { out }
        }
    }

    fn sample_trend() -> Trend {
        Trend {
            id: "abc123".to_string(),
            title: "Quantum Computing Breakthrough".to_string(),
            description: "Researchers announce a new qubit record.".to_string(),
            search_volume: Some("50,000".to_string()),
            related_topics: vec!["quantum".to_string()],
            source_url: "https://example.com/trend".to_string(),
            published_at: Utc::now(),
            raw: serde_json::Value::Null,
        }
    }

    fn structured_response() -> String {
        serde_json::json!({
            "title": "Quantum Computing Hits a New Milestone",
            "meta_description": "What the latest qubit record means for the field and for everyday computing in the years ahead.",
            "focus_keyword": "quantum computing",
            "content": "## The Record\n\nResearchers pushed past previous limits.",
            "excerpt": "A new qubit record.",
            "tags": ["quantum"],
            "image_suggestions": [],
            "seo_score": 82,
            "readability_score": 75
        })
        .to_string()
    }

    #[tokio::test]
    async fn primary_success_returns_structured_article() {
        let generator = Generator::<_, MockProvider>::new(
            MockProvider::ok(Provider::Gemini, &structured_response()),
            None,
            false,
            None,
        );
        let article = generator
            .generate_article(&sample_trend())
            .await
            .expect("should succeed");
        assert!(article.structured);
        assert_eq!(article.provider, Provider::Gemini);
        assert_eq!(article.focus_keyword, "quantum computing");
    }

    #[tokio::test]
    async fn fallback_covers_primary_failure() {
        let generator = Generator::new(
            MockProvider::failing(Provider::Gemini, "quota exceeded"),
            Some(MockProvider::ok(Provider::OpenAi, &structured_response())),
            true,
            None,
        );
        let article = generator
            .generate_article(&sample_trend())
            .await
            .expect("fallback should succeed");
        assert_eq!(article.provider, Provider::OpenAi);
    }

    #[tokio::test]
    async fn both_failures_report_both_messages() {
        let generator = Generator::new(
            MockProvider::failing(Provider::Gemini, "quota exceeded"),
            Some(MockProvider::failing(Provider::OpenAi, "server error")),
            true,
            None,
        );
        let err = generator
            .generate_article(&sample_trend())
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Both AI services failed. Gemini: "));
        assert!(message.contains(" | OpenAI: "));
        assert!(message.contains("quota exceeded"));
        assert!(message.contains("server error"));
    }

    #[tokio::test]
    async fn disabled_fallback_surfaces_primary_error_verbatim() {
        let generator = Generator::new(
            MockProvider::failing(Provider::Gemini, "quota exceeded"),
            Some(MockProvider::ok(Provider::OpenAi, &structured_response())),
            false,
            None,
        );
        let err = generator
            .generate_article(&sample_trend())
            .await
            .unwrap_err();
        assert!(
            matches!(err, AiError::Api { status: 500, .. }),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn plain_prose_degrades_when_no_fallback_remains() {
        let prose = "A Quantum Leap for Computing Hardware\n\nResearchers announced a record qubit count this week, a result that moves practical machines closer.\n\nThe work still faces error-correction hurdles before commercial use.";
        let generator = Generator::<_, MockProvider>::new(
            MockProvider::ok(Provider::Gemini, prose),
            None,
            false,
            None,
        );
        let article = generator
            .generate_article(&sample_trend())
            .await
            .expect("degraded path should salvage");
        assert!(!article.structured);
        assert_eq!(article.provider, Provider::Gemini);
        assert!(article.title.to_lowercase().contains("quantum"));
        assert!(article.content.contains("<p>"));
        assert!(!article.meta_description.is_empty());
        assert_eq!(article.tags, vec!["quantum"]);
    }

    #[tokio::test]
    async fn faq_generation_uses_fallback_chain() {
        let faq_json = serde_json::json!({
            "faqs": [
                {
                    "question": "What changed in quantum hardware?",
                    "answer": "A research team demonstrated a record number of usable qubits."
                }
            ]
        })
        .to_string();
        let generator = Generator::new(
            MockProvider::failing(Provider::Gemini, "quota exceeded"),
            Some(MockProvider::ok(Provider::OpenAi, &faq_json)),
            true,
            None,
        );
        let faqs = generator
            .generate_faqs(&sample_trend())
            .await
            .expect("fallback should deliver FAQs");
        assert_eq!(faqs.len(), 1);
        assert!(faqs[0].question.contains("quantum"));
    }
}
