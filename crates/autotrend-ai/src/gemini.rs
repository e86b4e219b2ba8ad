//! HTTP client for the Gemini-shaped generation API.
//!
//! POSTs the prompt as `contents[0].parts[0].text` with fixed sampling
//! parameters and server-side safety thresholds, and pulls the generated
//! text out of `candidates[0].content.parts[0].text`.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::provider::ContentProvider;
use crate::types::Provider;
use crate::AiError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Client for the Gemini generateContent endpoint.
///
/// Use [`GeminiClient::new`] for production or
/// [`GeminiClient::with_base_url`] to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, AiError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("autotrend/0.1 (content-generation)")
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.8,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 8192,
                "stopSequences": []
            },
            "safetySettings": SAFETY_CATEGORIES
                .iter()
                .map(|category| json!({
                    "category": category,
                    "threshold": "BLOCK_MEDIUM_AND_ABOVE"
                }))
                .collect::<Vec<_>>()
        })
    }

    /// Send a short prompt to verify connectivity and the configured key.
    ///
    /// Returns a success flag, a human-readable message, and a sample of the
    /// generated text on success.
    pub async fn test_connection(&self) -> (bool, String, Option<String>) {
        let prompt = "Write a brief test response to confirm API connectivity.";
        match self.generate_text(prompt).await {
            Ok(text) => {
                let sample: String = text.chars().take(100).collect();
                (
                    true,
                    "Gemini API connection successful".to_string(),
                    Some(sample),
                )
            }
            Err(e) => (false, e.to_string(), None),
        }
    }
}

impl ContentProvider for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.as_u16() != 200 {
            return Err(AiError::Api {
                provider: "Gemini",
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = serde_json::from_str(&body)?;
        let text = payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(serde_json::Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or(AiError::EmptyResponse("Gemini"))?;

        Ok(text.to_string())
    }
}
