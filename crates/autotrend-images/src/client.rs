//! HTTP client for the Pexels-shaped image search API.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::ImageError;

const DEFAULT_BASE_URL: &str = "https://api.pexels.com";
const MAX_PER_PAGE: u8 = 80;

/// A single photo result. Only the fields the pipeline consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub photographer: String,
    pub url: String,
    pub src: PhotoSources,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSources {
    pub original: String,
    pub large: String,
    pub medium: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

pub struct PexelsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    download_timeout: Duration,
}

impl PexelsClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_key: String, timeout_secs: u64) -> Result<Self, ImageError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL.to_string())
    }

    /// Same as [`PexelsClient::new`] but against an explicit base URL,
    /// used by tests to point at a mock server.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_base_url(
        api_key: String,
        timeout_secs: u64,
        base_url: String,
    ) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("autotrend/0.1")
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url,
            download_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Override the timeout used for image downloads, which are larger
    /// than search responses and get their own budget.
    #[must_use]
    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.download_timeout = Duration::from_secs(secs);
        self
    }

    /// Search for photos matching a query.
    ///
    /// # Errors
    ///
    /// - [`ImageError::Api`] on a non-200 response.
    /// - [`ImageError::NoImagesFound`] when the search matches nothing.
    pub async fn search(
        &self,
        query: &str,
        per_page: u8,
        orientation: &str,
    ) -> Result<Vec<Photo>, ImageError> {
        let url = format!("{}/v1/search", self.base_url);
        debug!(query, per_page, orientation, "searching for images");

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", query),
                ("per_page", &per_page.min(MAX_PER_PAGE).to_string()),
                ("orientation", orientation),
                ("size", "medium"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response.json().await?;
        if parsed.photos.is_empty() {
            return Err(ImageError::NoImagesFound(query.to_string()));
        }
        Ok(parsed.photos)
    }

    /// Search and return only the top-ranked photo.
    ///
    /// # Errors
    ///
    /// Same as [`PexelsClient::search`].
    pub async fn best_image(
        &self,
        query: &str,
        orientation: &str,
    ) -> Result<Photo, ImageError> {
        let mut photos = self.search(query, 10, orientation).await?;
        Ok(photos.remove(0))
    }

    /// Download an image's bytes.
    ///
    /// # Errors
    ///
    /// [`ImageError::Api`] on a non-200 response, [`ImageError::Http`] on
    /// transport failure.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self
            .client
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Api {
                status: status.as_u16(),
                body: format!("download failed for {url}"),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Probe the API with a fixed query. Returns whether the call worked
    /// and a human-readable summary for the CLI.
    pub async fn test_connection(&self) -> (bool, String) {
        match self.search("nature", 1, "landscape").await {
            Ok(photos) => (
                true,
                format!("image API reachable, sample photo id {}", photos[0].id),
            ),
            Err(ImageError::NoImagesFound(_)) => {
                (true, "image API reachable, no results for probe".to_string())
            }
            Err(err) => (false, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn photo_json(id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "photographer": "Jane Lens",
            "url": format!("https://example.com/photo/{id}"),
            "src": {
                "original": format!("https://example.com/photo/{id}/original.jpg"),
                "large": format!("https://example.com/photo/{id}/large.jpg"),
                "medium": format!("https://example.com/photo/{id}/medium.jpg")
            }
        })
    }

    #[tokio::test]
    async fn search_sends_auth_header_and_parses_photos() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("Authorization", "test-key"))
            .and(query_param("query", "stock market"))
            .and(query_param("orientation", "landscape"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "photos": [photo_json(42), photo_json(43)]
            })))
            .mount(&server)
            .await;

        let client =
            PexelsClient::with_base_url("test-key".to_string(), 5, server.uri()).unwrap();
        let photos = client.search("stock market", 10, "landscape").await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].id, 42);
        assert_eq!(photos[0].photographer, "Jane Lens");
    }

    #[tokio::test]
    async fn search_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = PexelsClient::with_base_url("k".to_string(), 5, server.uri()).unwrap();
        let err = client.search("anything", 10, "landscape").await.unwrap_err();
        assert!(
            matches!(err, ImageError::Api { status: 429, ref body } if body == "rate limited"),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn empty_results_become_no_images_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "photos": [] })),
            )
            .mount(&server)
            .await;

        let client = PexelsClient::with_base_url("k".to_string(), 5, server.uri()).unwrap();
        let err = client.search("obscurity", 10, "landscape").await.unwrap_err();
        assert!(
            matches!(err, ImageError::NoImagesFound(ref q) if q == "obscurity"),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn download_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/photo.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
            .mount(&server)
            .await;

        let client = PexelsClient::with_base_url("k".to_string(), 5, server.uri()).unwrap();
        let bytes = client
            .download(&format!("{}/photo.jpg", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }
}
