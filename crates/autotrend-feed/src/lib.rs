//! Trend ingestion for the autotrend pipeline.
//!
//! Fetches the trending-topics RSS feed, parses items (including the `ht:`
//! namespace extension fields carrying approximate traffic and news items),
//! applies the recency cutoff, and filters candidates by keyword relevance
//! and title-based dedup against recent history.

use thiserror::Error;

pub mod fetch;
pub mod filter;
pub mod parse;
pub mod types;

pub use fetch::TrendFeed;
pub use filter::filter_trends;
pub use types::Trend;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("failed to fetch feed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The feed endpoint answered with a non-2xx status.
    #[error("feed fetch returned HTTP {0}")]
    Status(u16),

    /// The feed endpoint answered 2xx with an empty body.
    #[error("empty feed response")]
    EmptyResponse,

    /// The feed body is not well-formed XML.
    #[error("feed XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
}
