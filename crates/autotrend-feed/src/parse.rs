//! RSS parsing for the trends feed.
//!
//! The feed is plain RSS 2.0 with a vendor namespace (`ht:`) carrying
//! `approx_traffic` and per-item `news_item` blocks. Parsed with a
//! quick-xml event loop; no DOM is built.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::types::{trend_id, Trend};
use crate::FeedError;

/// Accumulator for one `<item>` while the event loop walks it.
#[derive(Default)]
struct RawItem {
    title: String,
    link: String,
    description: String,
    pub_date: String,
    guid: String,
    traffic: String,
    news_titles: Vec<String>,
}

/// Parse a feed body into trends, dropping items published before `cutoff`.
///
/// Item order is preserved. Items whose `pubDate` cannot be parsed are
/// skipped with a warning rather than failing the whole feed.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the XML is malformed.
pub fn parse_feed(xml: &str, cutoff: DateTime<Utc>) -> Result<Vec<Trend>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut trends = Vec::new();
    let mut item: Option<RawItem> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "item" {
                    item = Some(RawItem::default());
                } else {
                    current_tag = name;
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if name == "item" {
                    if let Some(raw_item) = item.take() {
                        if let Some(trend) = finish_item(raw_item, cutoff) {
                            trends.push(trend);
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(raw_item) = item.as_mut() {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    record_field(raw_item, &current_tag, text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(raw_item) = item.as_mut() {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    record_field(raw_item, &current_tag, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    Ok(trends)
}

fn record_field(item: &mut RawItem, tag: &str, text: String) {
    match tag {
        "title" => item.title = text,
        "link" => item.link = text,
        "description" => item.description = text,
        "pubDate" => item.pub_date = text,
        "guid" => item.guid = text,
        "ht:approx_traffic" => item.traffic = text,
        "ht:news_item_title" => item.news_titles.push(text),
        _ => {}
    }
}

/// Turn a completed raw item into a [`Trend`], or `None` if it is stale or
/// its publish date is unparseable.
fn finish_item(item: RawItem, cutoff: DateTime<Utc>) -> Option<Trend> {
    let published_at = match DateTime::parse_from_rfc2822(&item.pub_date) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!(title = %item.title, error = %e, "skipping item with unparseable pubDate");
            return None;
        }
    };
    if published_at < cutoff {
        return None;
    }

    let description = if item.description.is_empty() {
        if item.news_titles.is_empty() {
            format!("Trending topic: {}", item.title)
        } else {
            item.news_titles
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(". ")
        }
    } else {
        item.description.clone()
    };

    let clean_description = strip_html(&description);
    let search_volume = extract_search_volume(&clean_description)
        .or_else(|| (!item.traffic.is_empty()).then(|| item.traffic.clone()));
    let related_topics = extract_related_topics(&clean_description);

    let raw = serde_json::json!({
        "title": item.title,
        "link": item.link,
        "description": item.description,
        "pub_date": item.pub_date,
        "guid": item.guid,
        "traffic": item.traffic,
        "news_titles": item.news_titles,
    });

    Some(Trend {
        id: trend_id(&item.title, &item.pub_date),
        title: clean_title(&item.title),
        description: clean_description,
        search_volume,
        related_topics,
        source_url: item.link,
        published_at,
        raw,
    })
}

/// Strip HTML tags from a string, returning plain text.
fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.trim().to_string()
}

/// Pull an explicit search-volume figure out of descriptive text, if present.
fn extract_search_volume(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)(\d[\d,]*)\s*searches?").expect("valid regex"));
    re.captures(text).map(|c| c[1].to_string())
}

/// Pull a comma-separated related-topics list after a `related:` marker.
fn extract_related_topics(text: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)related[:\s]+([^.]+)").expect("valid regex"));
    re.captures(text)
        .map(|c| {
            c[1].split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Clean and title-case a trend title: drop characters outside words,
/// whitespace, hyphens and dots, then capitalize each word.
pub(crate) fn clean_title(title: &str) -> String {
    let filtered: String = title
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '.' || *c == '_')
        .collect();

    filtered
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
