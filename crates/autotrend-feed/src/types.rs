use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// A candidate trending topic surfaced by the feed. Immutable once fetched.
#[derive(Debug, Clone)]
pub struct Trend {
    /// Stable content hash of title + publish date; the dedup key.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Approximate search volume when the feed carries it (e.g. `"200,000"`).
    pub search_volume: Option<String>,
    pub related_topics: Vec<String>,
    pub source_url: String,
    pub published_at: DateTime<Utc>,
    /// Raw per-item fields as parsed from the feed, kept for auditing.
    pub raw: serde_json::Value,
}

/// Derive the stable trend id from title and publish date.
///
/// Hashing the pair (rather than the feed guid) keeps the id stable across
/// feeds that rotate guids for the same topic.
#[must_use]
pub fn trend_id(title: &str, pub_date: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(pub_date.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_id_is_stable_for_same_inputs() {
        let a = trend_id("AI Breakthrough", "Mon, 04 Aug 2025 10:00:00 GMT");
        let b = trend_id("AI Breakthrough", "Mon, 04 Aug 2025 10:00:00 GMT");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn trend_id_differs_for_different_pub_dates() {
        let a = trend_id("AI Breakthrough", "Mon, 04 Aug 2025 10:00:00 GMT");
        let b = trend_id("AI Breakthrough", "Tue, 05 Aug 2025 10:00:00 GMT");
        assert_ne!(a, b);
    }
}
