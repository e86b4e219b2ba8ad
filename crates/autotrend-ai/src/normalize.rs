//! Markdown-to-HTML normalization for provider output.
//!
//! Providers are asked for clean HTML but routinely return markdown, or a
//! mix of both. Everything that reaches storage runs through these
//! converters so downstream consumers only ever see HTML.

use std::sync::OnceLock;

use regex::Regex;

/// Convert markdown-flavored text to HTML.
///
/// Handles `#`..`####` headings, ALL-CAPS lines promoted to `<h2>`,
/// `**bold**`, `*italic*`, `*`/`-` bullet lists, and blank-line paragraph
/// breaks. Lines that already start with an HTML tag pass through without
/// being wrapped again.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut list_items: Vec<String> = Vec::new();

    let flush_paragraph = |paragraph: &mut Vec<String>, blocks: &mut Vec<String>| {
        if !paragraph.is_empty() {
            blocks.push(format!("<p>{}</p>", paragraph.join(" ")));
            paragraph.clear();
        }
    };
    let flush_list = |list_items: &mut Vec<String>, blocks: &mut Vec<String>| {
        if !list_items.is_empty() {
            let items: String = list_items
                .iter()
                .map(|i| format!("<li>{i}</li>"))
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(format!("<ul>\n{items}\n</ul>"));
            list_items.clear();
        }
    };

    for raw_line in input.lines() {
        let line = raw_line.trim();

        if line.is_empty() {
            flush_list(&mut list_items, &mut blocks);
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(item) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
            flush_paragraph(&mut paragraph, &mut blocks);
            list_items.push(convert_inline(item.trim()));
            continue;
        }
        flush_list(&mut list_items, &mut blocks);

        if let Some((level, text)) = heading_level(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(format!("<h{level}>{}</h{level}>", convert_inline(text)));
            continue;
        }

        if is_all_caps_heading(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(format!("<h2>{line}</h2>"));
            continue;
        }

        if line.starts_with('<') {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(line.to_string());
            continue;
        }

        paragraph.push(convert_inline(line));
    }
    flush_list(&mut list_items, &mut blocks);
    flush_paragraph(&mut paragraph, &mut blocks);

    blocks.join("\n\n")
}

fn heading_level(line: &str) -> Option<(usize, &str)> {
    for level in (1..=4).rev() {
        let prefix = "#".repeat(level);
        if let Some(rest) = line.strip_prefix(&prefix) {
            if let Some(text) = rest.strip_prefix(' ') {
                return Some((level, text.trim()));
            }
        }
    }
    None
}

/// A standalone line of five or more characters consisting entirely of
/// uppercase letters, digits and spaces reads as a shouted section header.
fn is_all_caps_heading(line: &str) -> bool {
    line.len() >= 5
        && line.chars().any(|c| c.is_ascii_uppercase())
        && line
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' ')
}

fn convert_inline(text: &str) -> String {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    static ITALIC: OnceLock<Regex> = OnceLock::new();

    let bold = BOLD.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
    let italic = ITALIC.get_or_init(|| Regex::new(r"\*([^*]+)\*").expect("valid regex"));

    let out = bold.replace_all(text, "<strong>$1</strong>");
    italic.replace_all(&out, "<em>$1</em>").into_owned()
}

/// Strip inline markdown decoration from a single-line field such as a
/// title or meta description.
#[must_use]
pub fn clean_inline_markdown(text: &str) -> String {
    text.trim()
        .trim_start_matches('#')
        .trim()
        .replace("**", "")
        .replace('*', "")
        .replace('`', "")
}

/// Remove HTML tags, collapsing runs of whitespace left behind.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    static SPACE: OnceLock<Regex> = OnceLock::new();

    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"));
    let space = SPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let text = tag.replace_all(html, " ");
    space.replace_all(text.trim(), " ").into_owned()
}

/// Build a short excerpt from HTML content: tag-stripped text truncated to
/// 155 characters with an ellipsis when anything was cut.
#[must_use]
pub fn synthesize_excerpt(html: &str) -> String {
    let text = strip_tags(html);
    truncate_on_char(&text, 155)
}

fn truncate_on_char(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{}...", cut.trim_end())
}

/// Pull a title out of raw generated text.
///
/// Scans for the first line whose cleaned form is strictly between 10 and
/// 200 characters; that line is removed from the returned body. Section
/// heading lines (`##`, `H2:`, `**H2`) are never title candidates and stay
/// in the body. When no line qualifies the body is returned untouched and
/// the caller may fall back to the first `<h1>` after conversion.
#[must_use]
pub fn split_title(raw: &str) -> (Option<String>, String) {
    let mut title: Option<String> = None;
    let mut body_lines: Vec<&str> = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if title.is_none() {
            if trimmed.is_empty() {
                continue;
            }
            if !is_section_heading(trimmed) {
                let cleaned = strip_trailing_tag_list(&clean_inline_markdown(trimmed));
                let len = cleaned.chars().count();
                if len > 10 && len < 200 {
                    title = Some(cleaned);
                    continue;
                }
            }
        }
        body_lines.push(trimmed);
    }
    match title {
        Some(t) => (Some(t), body_lines.join("\n")),
        None => (None, raw.to_string()),
    }
}

fn is_section_heading(line: &str) -> bool {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    let heading = HEADING
        .get_or_init(|| Regex::new(r"^(?:#{2,}|H[2-6]:|\*\*H[2-6])").expect("valid regex"));
    heading.is_match(line)
}

/// Extract the text of the first `<h1>` in converted HTML.
#[must_use]
pub fn first_h1(html: &str) -> Option<String> {
    static H1: OnceLock<Regex> = OnceLock::new();
    let h1 = H1.get_or_init(|| Regex::new(r"(?s)<h1>(.*?)</h1>").expect("valid regex"));
    h1.captures(html)
        .map(|c| strip_tags(&c[1]).trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Drop a trailing parenthesized tag list, e.g.
/// `"Market Rally Continues (stocks, finance)"`.
#[must_use]
pub fn strip_trailing_tag_list(title: &str) -> String {
    static TRAILING: OnceLock<Regex> = OnceLock::new();
    let trailing =
        TRAILING.get_or_init(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("valid regex"));
    trailing.replace(title.trim(), "").into_owned()
}

/// Split a trailing parenthesized comma list off the end of raw text,
/// returning it as tags. Providers on the prose path often sign off with
/// `(tag one, tag two, tag three)` as a final line.
#[must_use]
pub fn split_trailing_tags(raw: &str) -> (Vec<String>, String) {
    let trimmed = raw.trim_end();
    let last_line_start = trimmed.rfind('\n').map_or(0, |i| i + 1);
    let last_line = trimmed[last_line_start..].trim();

    let is_tag_list = last_line.starts_with('(')
        && last_line.ends_with(')')
        && last_line.contains(',')
        && !last_line[1..last_line.len() - 1].contains(['(', ')']);
    if !is_tag_list {
        return (Vec::new(), raw.to_string());
    }

    let tags: Vec<String> = last_line[1..last_line.len() - 1]
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    (tags, trimmed[..last_line_start].trim_end().to_string())
}

/// Derive a meta description from converted HTML.
///
/// The first paragraph qualifies when its text is 50 to 300 characters;
/// anything over 160 is truncated to 157 plus an ellipsis. Returns `None`
/// when no paragraph falls in range.
#[must_use]
pub fn derive_meta_description(html: &str) -> Option<String> {
    static PARA: OnceLock<Regex> = OnceLock::new();
    let para = PARA.get_or_init(|| Regex::new(r"(?s)<p>(.*?)</p>").expect("valid regex"));

    let captures = para.captures(html)?;
    let text = strip_tags(&captures[1]);
    let len = text.chars().count();
    if !(50..=300).contains(&len) {
        return None;
    }
    if len > 160 {
        let cut: String = text.chars().take(157).collect();
        return Some(format!("{}...", cut.trim_end()));
    }
    Some(text)
}
