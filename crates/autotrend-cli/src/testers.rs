//! Connectivity probes and the filter tester, backing `autotrend test`.

use std::collections::HashSet;

use autotrend_core::AppConfig;
use autotrend_feed::{filter_trends, Trend};
use autotrend_images::PexelsClient;
use chrono::Utc;

pub(crate) async fn run_test_gemini(config: &AppConfig) {
    let Some(key) = config.gemini_api_key.as_deref() else {
        println!("Gemini: no API key configured");
        return;
    };
    match autotrend_ai::GeminiClient::new(key, &config.gemini_model, config.generate_timeout_secs) {
        Ok(client) => report(client.test_connection().await),
        Err(err) => println!("Gemini: failed to build client: {err}"),
    }
}

pub(crate) async fn run_test_openai(config: &AppConfig) {
    let Some(key) = config.openai_api_key.as_deref() else {
        println!("OpenAI: no API key configured");
        return;
    };
    match autotrend_ai::OpenAiClient::new(key, &config.openai_model, config.generate_timeout_secs) {
        Ok(client) => report(client.test_connection().await),
        Err(err) => println!("OpenAI: failed to build client: {err}"),
    }
}

pub(crate) async fn run_test_pexels(config: &AppConfig) {
    let Some(key) = config.pexels_api_key.as_ref() else {
        println!("Pexels: no API key configured");
        return;
    };
    match PexelsClient::new(key.clone(), config.image_search_timeout_secs) {
        Ok(client) => {
            let (ok, message) = client.test_connection().await;
            println!("{}: {message}", if ok { "ok" } else { "failed" });
        }
        Err(err) => println!("Pexels: failed to build client: {err}"),
    }
}

fn report((ok, message, sample): (bool, String, Option<String>)) {
    println!("{}: {message}", if ok { "ok" } else { "failed" });
    if let Some(sample) = sample {
        println!("  sample: {sample}");
    }
}

/// Run the keyword filter against a canned set of trends so operators can
/// see what their keyword list would let through.
pub(crate) fn run_test_filter(config: &AppConfig) {
    let keywords = autotrend_core::effective_keywords(config);
    println!("active keywords: [{}]", keywords.join(", "));

    let samples = sample_trends();
    let titles: Vec<String> = samples.iter().map(|t| t.title.clone()).collect();
    let matched = filter_trends(samples, &keywords, &HashSet::new());
    let matched_titles: HashSet<&str> = matched.iter().map(|t| t.title.as_str()).collect();

    for title in &titles {
        let verdict = if matched_titles.contains(title.as_str()) {
            "match"
        } else {
            "skip"
        };
        println!("  [{verdict}] {title}");
    }
    println!("{} of {} sample trends match", matched.len(), titles.len());
}

fn sample_trends() -> Vec<Trend> {
    [
        (
            "Stock Market Rally",
            "Major indexes climbed for a third straight session.",
        ),
        (
            "Championship Game Results",
            "The final ended in overtime after a tied fourth quarter.",
        ),
        (
            "New Smartphone Launch",
            "The latest flagship phone brings a faster chip and new camera.",
        ),
        (
            "Celebrity Award Show",
            "Winners and red carpet highlights from last night.",
        ),
        (
            "Local Weather Forecast",
            "A cold front moves through the region this weekend.",
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (title, description))| Trend {
        id: format!("sample-{i}"),
        title: title.to_string(),
        description: description.to_string(),
        search_volume: None,
        related_topics: Vec::new(),
        source_url: String::new(),
        published_at: Utc::now(),
        raw: serde_json::Value::Null,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keywords_match_expected_samples() {
        let keywords = autotrend_core::default_filter_keywords();
        let matched = filter_trends(sample_trends(), &keywords, &HashSet::new());
        let titles: Vec<&str> = matched.iter().map(|t| t.title.as_str()).collect();

        // "stock market" is a finance keyword hit; the weather sample has
        // no keyword overlap at all.
        assert!(titles.contains(&"Stock Market Rally"));
        assert!(!titles.contains(&"Local Weather Forecast"));
    }
}
