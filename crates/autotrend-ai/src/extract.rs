//! Response-shape normalization: ordered best-effort parsers that locate
//! structured JSON inside raw provider text, plus the heuristic Q/A splitter
//! used when FAQ output is not structured at all.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{FaqPair, GeneratedArticle, ImageSuggestion, Provider};
use crate::AiError;
use crate::{normalize, seo};

/// Fields a structured response must carry, checked in order. Gemini is
/// held to the full SEO set; the fallback provider only has to produce a
/// publishable article and the rest is derived.
fn required_fields(provider: Provider) -> &'static [&'static str] {
    match provider {
        Provider::Gemini => &["title", "content", "meta_description", "focus_keyword"],
        Provider::OpenAi => &["title", "content"],
    }
}

/// Locate a JSON object in generated text.
///
/// Attempts, in order: a ```` ```json ```` fenced block, a plain fenced
/// block, then a balanced-brace scan over the whole text. Returns `None`
/// when no candidate object exists at all.
#[must_use]
pub fn extract_json(content: &str) -> Option<String> {
    static FENCED_JSON: OnceLock<Regex> = OnceLock::new();
    static FENCED: OnceLock<Regex> = OnceLock::new();

    let fenced_json = FENCED_JSON
        .get_or_init(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("valid regex"));
    if let Some(c) = fenced_json.captures(content) {
        return Some(c[1].to_string());
    }

    let fenced =
        FENCED.get_or_init(|| Regex::new(r"(?s)```\s*(\{.*?\})\s*```").expect("valid regex"));
    if let Some(c) = fenced.captures(content) {
        return Some(c[1].to_string());
    }

    scan_balanced_object(content)
}

/// Scan for the first balanced `{...}` object, respecting string literals
/// and escapes. More robust than the nesting-limited regex it replaces.
fn scan_balanced_object(content: &str) -> Option<String> {
    let start = content.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in content[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(content[start..=start + offset].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Loosely-typed structured article as providers actually emit it: scores
/// arrive as numbers or strings, optional fields may be absent.
#[derive(Debug, serde::Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    meta_description: String,
    #[serde(default)]
    focus_keyword: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    image_suggestions: Vec<ImageSuggestion>,
    #[serde(default)]
    seo_score: serde_json::Value,
    #[serde(default)]
    readability_score: serde_json::Value,
}

fn coerce_score(value: &serde_json::Value) -> i32 {
    match value {
        serde_json::Value::Number(n) => {
            n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0) as i32
        }
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Parse a raw provider response into a structured [`GeneratedArticle`].
///
/// # Errors
///
/// - [`AiError::NoJsonFound`] when no JSON object can be located (carries
///   the raw text for the degraded unstructured path).
/// - [`AiError::JsonDecode`] when the located object is invalid JSON.
/// - [`AiError::MissingField`] when a field required for `provider` is
///   empty or absent.
pub fn parse_article(raw: &str, provider: Provider) -> Result<GeneratedArticle, AiError> {
    let json = extract_json(raw).ok_or_else(|| AiError::NoJsonFound {
        raw: raw.to_string(),
    })?;
    let parsed: RawArticle = serde_json::from_str(&json)?;

    for field in required_fields(provider) {
        let value = match *field {
            "title" => &parsed.title,
            "content" => &parsed.content,
            "meta_description" => &parsed.meta_description,
            _ => &parsed.focus_keyword,
        };
        if value.trim().is_empty() {
            return Err(AiError::MissingField((*field).to_string()));
        }
    }

    // Providers leak markdown into HTML-only fields often enough that both
    // paths run through the same converters.
    let content = normalize::markdown_to_html(&parsed.content);
    let title = normalize::clean_inline_markdown(&parsed.title);
    let excerpt = if parsed.excerpt.trim().is_empty() {
        normalize::synthesize_excerpt(&content)
    } else {
        normalize::clean_inline_markdown(&parsed.excerpt)
    };

    let focus_keyword = if parsed.focus_keyword.trim().is_empty() {
        seo::extract_focus_keyword(&title)
    } else {
        parsed.focus_keyword.trim().to_string()
    };
    let meta_description = if parsed.meta_description.trim().is_empty() {
        normalize::derive_meta_description(&content).unwrap_or_else(|| excerpt.clone())
    } else {
        normalize::clean_inline_markdown(&parsed.meta_description)
    };

    Ok(GeneratedArticle {
        title,
        meta_description,
        focus_keyword,
        content,
        excerpt,
        tags: parsed.tags,
        image_suggestions: parsed.image_suggestions,
        seo_score: coerce_score(&parsed.seo_score),
        readability_score: coerce_score(&parsed.readability_score),
        provider,
        structured: true,
    })
}

#[derive(Debug, serde::Deserialize)]
struct FaqEnvelope {
    #[serde(default)]
    faqs: Vec<FaqPair>,
}

/// Parse FAQ pairs from a raw provider response.
///
/// Structured extraction first (`{"faqs": [...]}`); when no JSON can be
/// located or it does not decode, falls back to the heuristic Q/A splitter.
/// Pairs with a question ≤ 10 chars or an answer ≤ 20 chars are dropped.
#[must_use]
pub fn parse_faqs(raw: &str) -> Vec<FaqPair> {
    if let Some(json) = extract_json(raw) {
        if let Ok(envelope) = serde_json::from_str::<FaqEnvelope>(&json) {
            let faqs: Vec<FaqPair> = envelope
                .faqs
                .into_iter()
                .filter(|f| !f.question.trim().is_empty() && !f.answer.trim().is_empty())
                .collect();
            if !faqs.is_empty() {
                return faqs;
            }
        }
    }
    parse_plain_faqs(raw)
}

/// Heuristic fallback: segment on question-like line starts and pair each
/// segment's text up to `?` with the remainder as the answer.
fn parse_plain_faqs(content: &str) -> Vec<FaqPair> {
    static STARTS: OnceLock<Regex> = OnceLock::new();
    static Q_PREFIX: OnceLock<Regex> = OnceLock::new();
    static A_PREFIX: OnceLock<Regex> = OnceLock::new();

    let starts = STARTS.get_or_init(|| {
        Regex::new(
            r"(?mi)^(?:Q:|Question:|\d+\.|\*\*Q:|What|How|Why|When|Where|Is|Are|Can|Do|Does)",
        )
        .expect("valid regex")
    });
    let q_prefix = Q_PREFIX
        .get_or_init(|| Regex::new(r"(?i)^(?:Q:|Question:|\d+\.\s*|\*\*Q:\*\*\s*)").expect("valid regex"));
    let a_prefix = A_PREFIX
        .get_or_init(|| Regex::new(r"(?i)^(?:A:|Answer:|\*\*A:\*\*\s*)").expect("valid regex"));

    let mut boundaries: Vec<usize> = starts.find_iter(content).map(|m| m.start()).collect();
    if boundaries.is_empty() {
        return Vec::new();
    }
    boundaries.push(content.len());

    let mut faqs = Vec::new();
    for pair in boundaries.windows(2) {
        let section = content[pair[0]..pair[1]].trim();
        let Some(q_end) = section.find('?') else {
            continue;
        };
        let question_raw = &section[..=q_end];
        let answer_raw = section[q_end + 1..].trim();

        let question = q_prefix.replace(question_raw.trim(), "").trim().to_string();
        let answer = a_prefix.replace(answer_raw, "").trim().to_string();

        if question.len() > 10 && answer.len() > 20 {
            faqs.push(FaqPair { question, answer });
        }
    }
    faqs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_from_json_fence() {
        let raw = "Here you go:\n```json\n{\"title\": \"T\"}\n```\nDone.";
        assert_eq!(extract_json(raw).as_deref(), Some("{\"title\": \"T\"}"));
    }

    #[test]
    fn extracts_json_from_plain_fence() {
        let raw = "```\n{\"title\": \"T\"}\n```";
        assert_eq!(extract_json(raw).as_deref(), Some("{\"title\": \"T\"}"));
    }

    #[test]
    fn extracts_nested_json_by_brace_matching() {
        let raw = "prefix {\"a\": {\"b\": \"with } inside string\"}, \"c\": 1} suffix";
        let json = extract_json(raw).expect("should find object");
        let value: serde_json::Value = serde_json::from_str(&json).expect("should parse");
        assert_eq!(value["c"], 1);
    }

    #[test]
    fn returns_none_when_no_object_exists() {
        assert!(extract_json("just prose, no JSON here").is_none());
    }

    fn full_article_json() -> String {
        serde_json::json!({
            "title": "**Markets Rally**",
            "meta_description": "A rally explained.".repeat(4),
            "focus_keyword": "markets rally",
            "content": "## Why It Matters\n\nStocks **jumped** today.",
            "excerpt": "",
            "tags": ["markets", "stocks"],
            "image_suggestions": [
                { "placement": "featured", "search_query": "stock chart", "alt_text": "chart" }
            ],
            "seo_score": "85",
            "readability_score": 78
        })
        .to_string()
    }

    #[test]
    fn parse_article_converts_markdown_and_coerces_scores() {
        let raw = format!("```json\n{}\n```", full_article_json());
        let article = parse_article(&raw, Provider::Gemini).expect("should parse");
        assert_eq!(article.title, "Markets Rally");
        assert!(article.content.contains("<h2>Why It Matters</h2>"));
        assert!(article.content.contains("<strong>jumped</strong>"));
        assert_eq!(article.seo_score, 85);
        assert_eq!(article.readability_score, 78);
        assert!(article.structured);
        assert!(!article.excerpt.is_empty());
        assert_eq!(article.image_suggestions.len(), 1);
    }

    #[test]
    fn parse_article_rejects_missing_content() {
        let raw = r#"{"title": "T", "meta_description": "M", "focus_keyword": "K"}"#;
        let err = parse_article(raw, Provider::Gemini).unwrap_err();
        assert!(
            matches!(err, AiError::MissingField(ref f) if f == "content"),
            "got: {err:?}"
        );
    }

    #[test]
    fn fallback_response_without_seo_fields_is_accepted() {
        let raw = serde_json::json!({
            "title": "Markets Rally on Rate Cut Hopes",
            "content": "Stocks climbed across the board as traders priced in easier policy for the rest of the year."
        })
        .to_string();

        let err = parse_article(&raw, Provider::Gemini).unwrap_err();
        assert!(matches!(err, AiError::MissingField(ref f) if f == "meta_description"));

        let article = parse_article(&raw, Provider::OpenAi).expect("should parse for fallback");
        assert_eq!(article.focus_keyword, "markets rally");
        assert!(!article.meta_description.is_empty());
        assert!(article.structured);
    }

    #[test]
    fn parse_article_without_json_carries_raw_text() {
        let raw = "A plain prose article about markets.";
        let err = parse_article(raw, Provider::Gemini).unwrap_err();
        match err {
            AiError::NoJsonFound { raw: carried } => assert_eq!(carried, raw),
            other => panic!("expected NoJsonFound, got: {other:?}"),
        }
    }

    #[test]
    fn parse_faqs_prefers_structured_envelope() {
        let raw = r#"{"faqs": [{"question": "What is a market rally?", "answer": "A sustained rise in prices across an index."}]}"#;
        let faqs = parse_faqs(raw);
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "What is a market rally?");
    }

    #[test]
    fn parse_faqs_heuristic_splits_plain_text() {
        let raw = "Q: What is a market rally exactly?\nA sustained rise in prices across a broad index over days.\n\nQ: How long do rallies usually last overall?\nAnywhere from a few sessions to several months depending on conditions.";
        let faqs = parse_faqs(raw);
        assert_eq!(faqs.len(), 2);
        assert!(faqs[0].question.ends_with('?'));
        assert!(!faqs[0].question.starts_with("Q:"));
        assert!(faqs[1].answer.contains("few sessions"));
    }

    #[test]
    fn parse_faqs_drops_short_pairs() {
        let raw = "Q: Why?\nBecause.\n\nQ: What is the actual question here?\nThis answer is comfortably longer than twenty characters.";
        let faqs = parse_faqs(raw);
        assert_eq!(faqs.len(), 1);
        assert!(faqs[0].question.contains("actual question"));
    }
}
