//! AI content generation for the autotrend pipeline.
//!
//! A [`ContentProvider`] is anything that turns a prompt into raw text; the
//! Gemini-shaped client is the primary and the OpenAI-shaped client the
//! fallback. [`Generator`] drives the primary→fallback chain, extracts the
//! structured JSON article from the raw response, and degrades to the
//! markdown normalizer + SEO optimizer when no structured output exists and
//! no fallback is available.

use thiserror::Error;

pub mod extract;
pub mod generator;
pub mod gemini;
pub mod normalize;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod seo;
pub mod types;

pub use generator::Generator;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use provider::ContentProvider;
pub use types::{FaqPair, GeneratedArticle, ImageSuggestion, Placement, Provider};

#[derive(Debug, Error)]
pub enum AiError {
    /// The provider is not configured with an API key.
    #[error("{0} API key not configured")]
    NoApiKey(&'static str),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-200 status.
    #[error("{provider} API returned error {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The provider answered 200 but the generated text is absent.
    #[error("empty response from {0} API")]
    EmptyResponse(&'static str),

    /// The response body is not valid JSON.
    #[error("failed to decode API response: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// No JSON object could be located in the generated text at all.
    /// Carries the raw text so the caller can degrade to unstructured parsing.
    #[error("no valid JSON found in response")]
    NoJsonFound { raw: String },

    /// The structured response is missing a required field.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Primary and fallback providers both failed.
    #[error("Both AI services failed. Gemini: {primary} | OpenAI: {fallback}")]
    BothProvidersFailed { primary: String, fallback: String },
}
