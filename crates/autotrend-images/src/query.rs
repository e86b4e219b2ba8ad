//! Search-query shaping: provider suggestions tend to be either too vague
//! ("image") or too specific to return anything, so queries get enhanced
//! with keywords pulled from the article title.

const STOPWORDS: [&str; 30] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "has", "have", "had", "will", "would",
    "what", "how", "why", "new",
];

const MAX_QUERY_WORDS: usize = 5;

/// Abstract topic words mapped to terms that actually photograph well.
const VISUAL_TERMS: [(&str, &str); 10] = [
    ("stock", "stock market chart"),
    ("market", "stock market chart"),
    ("finance", "business finance desk"),
    ("crypto", "cryptocurrency coins"),
    ("bitcoin", "cryptocurrency coins"),
    ("ai", "technology computer circuit"),
    ("software", "laptop code screen"),
    ("startup", "office team meeting"),
    ("economy", "city skyline business"),
    ("health", "healthcare medical"),
];

/// Swap the first abstract keyword in a query for its photogenic
/// equivalent. Queries without a mapped word come back unchanged.
#[must_use]
pub fn expand_visual_terms(query: &str) -> String {
    for word in query.split_whitespace() {
        if let Some((_, visual)) = VISUAL_TERMS.iter().find(|(k, _)| *k == word) {
            return (*visual).to_string();
        }
    }
    query.to_string()
}

/// Pull up to five searchable keywords out of a title: lowercase,
/// punctuation stripped, stopwords and one/two-letter words dropped.
#[must_use]
pub fn extract_title_keywords(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(&w.as_str()))
        .take(MAX_QUERY_WORDS)
        .collect()
}

/// Merge a suggested query with title keywords, deduplicated, capped at
/// five words. The suggestion's own words come first so its intent wins.
#[must_use]
pub fn enhance_query(query: &str, title: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for word in query
        .split_whitespace()
        .map(str::to_lowercase)
        .chain(extract_title_keywords(title))
    {
        if words.len() >= MAX_QUERY_WORDS {
            break;
        }
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words.join(" ")
}

/// The queries to try for one suggestion, most specific first: enhanced,
/// then the raw suggestion, then the visual-term expansion, then title
/// keywords alone. Blanks and duplicates are dropped.
#[must_use]
pub fn query_candidates(suggestion_query: &str, title: &str) -> Vec<String> {
    let enhanced = enhance_query(suggestion_query, title);
    let visual = expand_visual_terms(&enhanced);
    let mut candidates = Vec::new();
    for candidate in [
        enhanced,
        suggestion_query.trim().to_lowercase(),
        visual,
        extract_title_keywords(title).join(" "),
    ] {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_keywords_drop_stopwords_and_short_words() {
        assert_eq!(
            extract_title_keywords("The Rise of AI in Modern Finance"),
            vec!["rise", "modern", "finance"]
        );
    }

    #[test]
    fn title_keywords_cap_at_five() {
        let keywords =
            extract_title_keywords("quantum computers reshape finance medicine logistics energy");
        assert_eq!(keywords.len(), 5);
    }

    #[test]
    fn enhance_merges_without_duplicates() {
        assert_eq!(
            enhance_query("stock market", "Stock Market Rally Continues Today"),
            "stock market rally continues today"
        );
    }

    #[test]
    fn candidates_are_ordered_and_unique() {
        let candidates = query_candidates("city skyline", "Housing Prices Climb");
        assert_eq!(
            candidates,
            vec![
                "city skyline housing prices climb".to_string(),
                "city skyline".to_string(),
                "housing prices climb".to_string(),
            ]
        );
    }

    #[test]
    fn visual_expansion_replaces_abstract_terms() {
        assert_eq!(expand_visual_terms("crypto rally"), "cryptocurrency coins");
        assert_eq!(expand_visual_terms("city skyline"), "city skyline");
    }

    #[test]
    fn candidates_include_visual_expansion() {
        let candidates = query_candidates("stock rally", "Markets Climb");
        assert!(candidates.contains(&"stock market chart".to_string()));
    }

    #[test]
    fn blank_suggestion_still_yields_title_candidate() {
        let candidates = query_candidates("", "Housing Prices Climb");
        assert_eq!(candidates, vec!["housing prices climb".to_string()]);
    }
}
