//! HTTP client for the OpenAI-shaped chat-completions API (the fallback
//! provider). Text comes back in `choices[0].message.content`.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::provider::ContentProvider;
use crate::types::Provider;
use crate::AiError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const SYSTEM_MESSAGE: &str = "You are an expert SEO content writer and blogger. Always respond \
with valid JSON format as specified in the user prompt.";

/// Client for the chat-completions endpoint.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
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

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_MESSAGE },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": 4000,
            "temperature": 0.8,
            "top_p": 0.95,
            "frequency_penalty": 0.0,
            "presence_penalty": 0.0
        })
    }

    /// Send a short prompt to verify connectivity and the configured key.
    pub async fn test_connection(&self) -> (bool, String, Option<String>) {
        let prompt = "Write a brief test response to confirm API connectivity.";
        match self.generate_text(prompt).await {
            Ok(text) => {
                let sample: String = text.chars().take(100).collect();
                (
                    true,
                    "OpenAI API connection successful".to_string(),
                    Some(sample),
                )
            }
            Err(e) => (false, e.to_string(), None),
        }
    }
}

impl ContentProvider for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.as_u16() != 200 {
            return Err(AiError::Api {
                provider: "OpenAI",
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = serde_json::from_str(&body)?;
        let text = payload
            .pointer("/choices/0/message/content")
            .and_then(serde_json::Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or(AiError::EmptyResponse("OpenAI"))?;

        Ok(text.to_string())
    }
}
