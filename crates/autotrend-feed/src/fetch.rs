//! HTTP fetch of the trends feed.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;

use crate::parse::parse_feed;
use crate::types::Trend;
use crate::FeedError;

/// Client for the trending-topics RSS feed.
///
/// Pure read: fetching has no side effects beyond the outbound request.
pub struct TrendFeed {
    client: Client,
    url: String,
    cutoff_hours: i64,
}

impl TrendFeed {
    /// Creates a feed client with the configured URL, timeout, and recency
    /// cutoff (in hours).
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Fetch`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(url: &str, timeout_secs: u64, cutoff_hours: i64) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("autotrend/0.1 (trend-ingest)")
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            cutoff_hours,
        })
    }

    /// Fetch and parse the feed, returning trends newer than the cutoff in
    /// feed order.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Fetch`] on network failure.
    /// - [`FeedError::Status`] on a non-2xx response.
    /// - [`FeedError::EmptyResponse`] if the body is empty.
    /// - [`FeedError::Xml`] if the body is not well-formed XML.
    pub async fn fetch_trends(&self) -> Result<Vec<Trend>, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FeedError::EmptyResponse);
        }

        let cutoff = Utc::now() - chrono::Duration::hours(self.cutoff_hours);
        let trends = parse_feed(&body, cutoff)?;
        tracing::debug!(count = trends.len(), url = %self.url, "fetched trends");
        Ok(trends)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn feed_body() -> String {
        format!(
            r#"<rss version="2.0"><channel><item>
                 <title>market rally</title>
                 <link>https://example.com/rally</link>
                 <pubDate>{}</pubDate>
               </item></channel></rss>"#,
            Utc::now().to_rfc2822()
        )
    }

    #[tokio::test]
    async fn fetch_trends_parses_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed_body()))
            .mount(&server)
            .await;

        let feed = TrendFeed::new(&server.uri(), 30, 72).expect("client should build");
        let trends = feed.fetch_trends().await.expect("fetch should succeed");
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].title, "Market Rally");
    }

    #[tokio::test]
    async fn non_2xx_status_is_fetch_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let feed = TrendFeed::new(&server.uri(), 30, 72).expect("client should build");
        let err = feed.fetch_trends().await.unwrap_err();
        assert!(matches!(err, FeedError::Status(503)), "got: {err:?}");
    }

    #[tokio::test]
    async fn empty_body_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let feed = TrendFeed::new(&server.uri(), 30, 72).expect("client should build");
        let err = feed.fetch_trends().await.unwrap_err();
        assert!(matches!(err, FeedError::EmptyResponse), "got: {err:?}");
    }
}
