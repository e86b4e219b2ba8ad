//! Lightweight SEO heuristics applied to generated articles, and the sole
//! source of metadata for the degraded unstructured path.

use crate::types::GeneratedArticle;

const STOPWORDS: [&str; 24] = [
    "the", "and", "for", "with", "that", "this", "from", "have", "will", "your", "what", "when",
    "where", "which", "their", "about", "into", "over", "after", "been", "more", "most", "some",
    "they",
];

/// Words kept lowercase inside a title-cased string unless leading.
const SMALL_WORDS: [&str; 12] = [
    "a", "an", "and", "as", "at", "by", "for", "in", "of", "on", "or", "the",
];

/// Derive a focus keyword from a title: drop stopwords and short words,
/// keep the first two survivors.
#[must_use]
pub fn extract_focus_keyword(title: &str) -> String {
    let words: Vec<String> = title
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.len() > 3 && !STOPWORDS.contains(&w.as_str()))
        .take(2)
        .collect();
    if words.is_empty() {
        title.trim().to_lowercase()
    } else {
        words.join(" ")
    }
}

/// Title-case a string, leaving small connector words lowercase except in
/// leading position.
#[must_use]
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && SMALL_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => lower,
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rework a title for search: ensure the focus keyword appears, title-case
/// it and keep it at 60 characters or fewer.
#[must_use]
pub fn optimize_title(title: &str, focus_keyword: &str) -> String {
    let mut out = title.trim().to_string();
    if !out.to_lowercase().contains(&focus_keyword.to_lowercase()) {
        out = format!("{}: {out}", title_case(focus_keyword));
    }
    out = title_case(&out);
    if out.chars().count() > 60 {
        let cut: String = out.chars().take(57).collect();
        out = format!("{}...", cut.trim_end());
    }
    out
}

/// Additive content score out of 100. Rough by design; it only has to rank
/// drafts relative to each other.
#[must_use]
pub fn compute_seo_score(article: &GeneratedArticle) -> i32 {
    let keyword = article.focus_keyword.to_lowercase();
    let title = article.title.to_lowercase();
    let meta = article.meta_description.to_lowercase();
    let content = article.content.to_lowercase();

    let mut score = 0;
    if !keyword.is_empty() && title.contains(&keyword) {
        score += 25;
    }
    if !keyword.is_empty() && meta.contains(&keyword) {
        score += 15;
    }
    let meta_len = article.meta_description.chars().count();
    if (50..=160).contains(&meta_len) {
        score += 15;
    }
    if content.split_whitespace().count() >= 300 {
        score += 20;
    }
    if content.contains("<h2>") {
        score += 15;
    }
    if content.contains("<ul>") {
        score += 10;
    }
    score.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provider;

    #[test]
    fn focus_keyword_skips_stopwords_and_short_words() {
        assert_eq!(
            extract_focus_keyword("The Rise of Quantum Computing in 2025"),
            "rise quantum"
        );
    }

    #[test]
    fn focus_keyword_falls_back_to_whole_title() {
        assert_eq!(extract_focus_keyword("The And For It"), "the and for it");
    }

    #[test]
    fn title_case_keeps_small_words_lowercase() {
        assert_eq!(
            title_case("the rise of quantum computing"),
            "The Rise of Quantum Computing"
        );
    }

    #[test]
    fn optimize_title_prepends_missing_keyword_and_truncates() {
        let out = optimize_title("An Overview You Should Read", "quantum computing");
        assert!(out.starts_with("Quantum Computing:"));
        assert!(out.chars().count() <= 60);
    }

    #[test]
    fn optimize_title_leaves_keyword_in_place() {
        let out = optimize_title("quantum computing explained", "quantum computing");
        assert_eq!(out, "Quantum Computing Explained");
    }

    #[test]
    fn seo_score_rewards_structure_and_caps_at_100() {
        let body = format!(
            "<h2>Section</h2>\n<ul>\n<li>point</li>\n</ul>\n<p>{}</p>",
            "market words repeated here ".repeat(80)
        );
        let article = GeneratedArticle {
            title: "Market Rally Deep Dive".to_string(),
            meta_description: "A look at the market rally and what traders should watch next."
                .to_string(),
            focus_keyword: "market rally".to_string(),
            content: body,
            excerpt: String::new(),
            tags: vec![],
            image_suggestions: vec![],
            seo_score: 0,
            readability_score: 0,
            provider: Provider::Gemini,
            structured: false,
        };
        let score = compute_seo_score(&article);
        assert_eq!(score, 100);
    }
}
