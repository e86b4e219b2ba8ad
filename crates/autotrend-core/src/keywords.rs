//! Default trend-filter keywords and the override rule.

use crate::AppConfig;

/// Built-in keyword set covering the categories the pipeline targets.
/// A trend must match at least one keyword (case-insensitive substring
/// against title + description) to be processed.
#[must_use]
pub fn default_filter_keywords() -> Vec<String> {
    [
        // Business & finance
        "business",
        "finance",
        "financial",
        "stock",
        "stocks",
        "market",
        "markets",
        "trading",
        "investment",
        "investing",
        "investor",
        "economy",
        "economic",
        "revenue",
        "profit",
        "earnings",
        "nasdaq",
        "dow jones",
        "sp500",
        "forex",
        "banking",
        "bank",
        "payment",
        "payments",
        "ecommerce",
        "IPO",
        "merger",
        "acquisition",
        // Technology & innovation
        "AI",
        "artificial intelligence",
        "machine learning",
        "crypto",
        "cryptocurrency",
        "bitcoin",
        "blockchain",
        "ethereum",
        "technology",
        "tech",
        "startup",
        "startups",
        "entrepreneur",
        "entrepreneurship",
        "venture capital",
        "VC",
        "fintech",
        "digital",
        "innovation",
        "software",
        "SaaS",
        "app",
        "platform",
        // Sports & entertainment
        "NBA",
        "basketball",
        "football",
        "sports",
        "athlete",
        "team",
        "player",
        "game",
        "entertainment",
        "movie",
        "film",
        "TV",
        "series",
        "streaming",
        "music",
        "artist",
        "celebrity",
        "actor",
        "actress",
        "singer",
        "Hollywood",
        "Netflix",
        "Disney",
        // Health & science
        "health",
        "medical",
        "healthcare",
        "science",
        "research",
        "study",
        "breakthrough",
        // News & politics
        "news",
        "politics",
        "election",
        "government",
        "policy",
        "law",
        "court",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

/// Resolve the effective keyword list for a config.
///
/// An operator-supplied list fully replaces the defaults (no merge). Entries
/// are trimmed and empties dropped; an operator list that is empty after
/// trimming is honored as-is and will match nothing.
#[must_use]
pub fn effective_keywords(config: &AppConfig) -> Vec<String> {
    match &config.filter_keywords {
        Some(list) => list
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        None => default_filter_keywords(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_core_categories() {
        let defaults = default_filter_keywords();
        for expected in ["finance", "AI", "crypto", "health", "news"] {
            assert!(
                defaults.iter().any(|k| k == expected),
                "default keywords should include '{expected}'"
            );
        }
    }

    #[test]
    fn defaults_have_no_empty_entries() {
        assert!(default_filter_keywords()
            .iter()
            .all(|k| !k.trim().is_empty()));
    }
}
