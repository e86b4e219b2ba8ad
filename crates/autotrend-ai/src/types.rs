use serde::{Deserialize, Serialize};

/// Which AI service produced a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAi,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Where an image suggestion wants its image placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Featured,
    Content,
}

/// Advisory image request emitted by the generator alongside an article.
/// The resolver may discard it when no image can be found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSuggestion {
    pub placement: Placement,
    pub search_query: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// One generated article. `content` is mutated in place exactly once by the
/// image resolver when content images are embedded; everything else is fixed
/// at creation.
#[derive(Debug, Clone)]
pub struct GeneratedArticle {
    pub title: String,
    pub meta_description: String,
    pub focus_keyword: String,
    /// HTML body.
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub image_suggestions: Vec<ImageSuggestion>,
    pub seo_score: i32,
    pub readability_score: i32,
    /// Which provider produced this article (primary or fallback).
    pub provider: Provider,
    /// False only on the degraded path where no structured JSON existed and
    /// the markdown normalizer reconstructed the article.
    pub structured: bool,
}

/// One question/answer pair from FAQ generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqPair {
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_suggestion_deserializes_lowercase_placement() {
        let json = r#"{"placement":"featured","search_query":"stock market chart"}"#;
        let suggestion: ImageSuggestion = serde_json::from_str(json).expect("should parse");
        assert_eq!(suggestion.placement, Placement::Featured);
        assert_eq!(suggestion.search_query, "stock market chart");
        assert!(suggestion.alt_text.is_empty());
        assert!(suggestion.caption.is_none());
    }

    #[test]
    fn provider_displays_lowercase() {
        assert_eq!(Provider::Gemini.to_string(), "gemini");
        assert_eq!(Provider::OpenAi.to_string(), "openai");
    }
}
