//! Prompt construction for article and FAQ generation.

use autotrend_feed::Trend;

/// Appended to operator-supplied templates so the structured-output contract
/// holds regardless of what the custom prompt says.
pub const JSON_STRUCTURE_INSTRUCTION: &str = "IMPORTANT: Respond with a valid JSON object \
containing: title, meta_description, focus_keyword, content, excerpt, tags, image_suggestions \
(with placement, search_query, alt_text), seo_score, and readability_score.";

/// Build the article prompt for a trend.
///
/// A custom template has `{trend_title}` substituted and the JSON structure
/// instruction appended; otherwise the built-in default prompt is used.
#[must_use]
pub fn build_article_prompt(trend: &Trend, custom: Option<&str>) -> String {
    match custom {
        Some(template) => {
            let mut prompt = template.replace("{trend_title}", &trend.title);
            prompt.push_str("\n\n");
            prompt.push_str(JSON_STRUCTURE_INSTRUCTION);
            prompt
        }
        None => default_article_prompt(trend),
    }
}

fn default_article_prompt(trend: &Trend) -> String {
    let related = trend.related_topics.join(", ");
    format!(
        "You are an expert SEO content writer and blogger. Create a comprehensive, engaging \
blog post about '{title}' that will rank well in search engines and provide real value to readers.

**CONTEXT:** {context}
**RELATED TOPICS:** {related}

**REQUIREMENTS:**
1. Write a minimum of 1200 words
2. Use a conversational, human-like tone
3. Include actionable insights and practical tips
4. Optimize for SEO without keyword stuffing
5. Structure content with clear headings (H2, H3)
6. Suggest relevant images for better engagement

**FORMATTING REQUIREMENTS:**
- Use ONLY proper HTML formatting (NOT markdown)
- Use <h2> and <h3> tags for headings, <p> for paragraphs
- Use <strong> and <em> for emphasis (NOT * or _)
- Use <ul> and <li> for bullet points (NOT * or -)

**IMPORTANT:** You must respond with a valid JSON object with this structure:

```json
{{
    \"title\": \"SEO-optimized title (50-60 characters)\",
    \"meta_description\": \"Compelling meta description (150-160 characters)\",
    \"focus_keyword\": \"Primary keyword for SEO\",
    \"content\": \"Full blog post content with proper HTML formatting (NO MARKDOWN)\",
    \"excerpt\": \"Brief excerpt (150-160 characters)\",
    \"tags\": [\"tag1\", \"tag2\", \"tag3\", \"tag4\", \"tag5\"],
    \"image_suggestions\": [
        {{
            \"placement\": \"featured\",
            \"search_query\": \"specific search terms for featured image\",
            \"alt_text\": \"SEO-optimized alt text\"
        }},
        {{
            \"placement\": \"content\",
            \"search_query\": \"specific search terms for content image\",
            \"alt_text\": \"SEO-optimized alt text\",
            \"caption\": \"Image caption text\"
        }}
    ],
    \"seo_score\": 85,
    \"readability_score\": 78
}}
```

Generate the JSON response now:",
        title = trend.title,
        context = trend.description,
        related = related,
    )
}

/// Build the FAQ prompt for a trend: 8-12 Q/A pairs as `{"faqs": [...]}`.
#[must_use]
pub fn build_faq_prompt(trend: &Trend) -> String {
    format!(
        "You are an expert content creator. Generate a comprehensive list of frequently asked \
questions (FAQs) about the trending topic: '{title}'.

**CONTEXT:** {context}

**REQUIREMENTS:**
1. Generate 8-12 diverse and relevant questions
2. Provide detailed, informative answers (100-200 words each)
3. Cover different aspects of the topic (basics, advanced, practical)
4. Make questions natural and commonly asked
5. Use simple, accessible language

**FORMAT:** Return your response as a JSON object with this exact structure:

{{
    \"faqs\": [
        {{
            \"question\": \"Clear, specific question about {title}?\",
            \"answer\": \"Detailed, informative answer with practical information.\"
        }}
    ]
}}

Generate comprehensive FAQs about '{title}' now:",
        title = trend.title,
        context = trend.description,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn trend(title: &str) -> Trend {
        Trend {
            id: "x".repeat(64),
            title: title.to_string(),
            description: "Context sentence.".to_string(),
            search_volume: None,
            related_topics: vec!["markets".to_string(), "economy".to_string()],
            source_url: "https://example.com".to_string(),
            published_at: Utc::now(),
            raw: serde_json::Value::Null,
        }
    }

    #[test]
    fn custom_prompt_substitutes_title_and_appends_instruction() {
        let t = trend("Fed Rate Decision");
        let prompt = build_article_prompt(&t, Some("Write about {trend_title} in depth."));
        assert!(prompt.starts_with("Write about Fed Rate Decision in depth."));
        assert!(prompt.ends_with(JSON_STRUCTURE_INSTRUCTION));
    }

    #[test]
    fn default_prompt_includes_context_and_related_topics() {
        let t = trend("Fed Rate Decision");
        let prompt = build_article_prompt(&t, None);
        assert!(prompt.contains("'Fed Rate Decision'"));
        assert!(prompt.contains("Context sentence."));
        assert!(prompt.contains("markets, economy"));
        assert!(prompt.contains("\"image_suggestions\""));
    }

    #[test]
    fn faq_prompt_requests_json_faqs_object() {
        let t = trend("Fed Rate Decision");
        let prompt = build_faq_prompt(&t);
        assert!(prompt.contains("\"faqs\""));
        assert!(prompt.contains("8-12"));
    }
}
