//! Keyword relevance filter and recency dedup. Pure functions; callers
//! load the recent-history title set from the generation log.

use std::collections::HashSet;

use crate::types::Trend;

/// Filter trends by keyword relevance and recent-history dedup.
///
/// A trend is kept iff at least one keyword matches (case-insensitive
/// substring against title + description) and its exact title is absent
/// from `recent_titles`. Feed order is preserved.
///
/// An empty keyword list matches nothing: a misconfigured operator list
/// must not silently let every trend through.
#[must_use]
pub fn filter_trends(
    trends: Vec<Trend>,
    keywords: &[String],
    recent_titles: &HashSet<String>,
) -> Vec<Trend> {
    trends
        .into_iter()
        .filter(|t| {
            if recent_titles.contains(&t.title) {
                tracing::debug!(trend = %t.title, "skipping recently processed trend");
                return false;
            }
            matches_keywords(t, keywords)
        })
        .collect()
}

/// True iff any keyword appears, case-insensitively, in title + description.
#[must_use]
pub fn matches_keywords(trend: &Trend, keywords: &[String]) -> bool {
    let haystack = format!("{} {}", trend.title, trend.description).to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::trend_id;

    fn trend(title: &str, description: &str) -> Trend {
        Trend {
            id: trend_id(title, "Mon, 04 Aug 2025 10:00:00 GMT"),
            title: title.to_string(),
            description: description.to_string(),
            search_volume: None,
            related_topics: Vec::new(),
            source_url: "https://example.com".to_string(),
            published_at: Utc::now(),
            raw: serde_json::Value::Null,
        }
    }

    fn kw(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn keyword_match_is_literal_substring_not_semantic() {
        let keywords = kw(&["AI", "finance"]);
        let bitcoin = trend("Bitcoin Price Surge", "Cryptocurrency markets see major gains");
        let ai = trend("AI Technology Breakthrough", "New artificial intelligence development");

        // "cryptocurrency" is related to finance but contains neither keyword.
        assert!(!matches_keywords(&bitcoin, &keywords));
        assert!(matches_keywords(&ai, &keywords));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let keywords = kw(&["nasdaq"]);
        let t = trend("NASDAQ Hits Record", "Index closes at an all-time high");
        assert!(matches_keywords(&t, &keywords));
    }

    #[test]
    fn empty_keyword_list_matches_nothing() {
        let keywords: Vec<String> = Vec::new();
        let t = trend("Anything At All", "Any description");
        let kept = filter_trends(vec![t], &keywords, &HashSet::new());
        assert!(kept.is_empty());
    }

    #[test]
    fn recent_title_is_deduped() {
        let keywords = kw(&["market"]);
        let t = trend("Stock Market Rally", "Markets rallied today");
        let mut recent = HashSet::new();
        recent.insert("Stock Market Rally".to_string());

        let kept = filter_trends(vec![t], &keywords, &recent);
        assert!(kept.is_empty());
    }

    #[test]
    fn feed_order_is_preserved() {
        let keywords = kw(&["tech"]);
        let trends = vec![
            trend("Tech One", "tech story"),
            trend("Unrelated Cooking Show", "recipes"),
            trend("Tech Two", "another tech story"),
        ];
        let kept = filter_trends(trends, &keywords, &HashSet::new());
        let titles: Vec<&str> = kept.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Tech One", "Tech Two"]);
    }
}
