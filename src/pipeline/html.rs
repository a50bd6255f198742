//! HTML-to-text conversion for fetched pages.
//!
//! Deterministic regex passes, in order:
//!
//! 1. Drop `<script>`, `<style>` and `<head>` elements with their content
//! 2. Drop comments
//! 3. Block-level tags (`p`, `div`, `br`, `h1`–`h6`, `li`, `tr`) become line breaks
//! 4. Remaining tags are removed
//! 5. Decode character entities
//! 6. Collapse runs of spaces, trim each line, drop blank lines
//!
//! Entities are decoded after tag removal so that an escaped `&lt;b&gt;` in
//! the text survives as a literal `<b>`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_DROP_ELEMENTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["script", "style", "head"]
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).unwrap())
        .collect()
});

static RE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static RE_BLOCK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:p|div|br|h[1-6]|li|tr)\b[^>]*>").unwrap());

static RE_ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static RE_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());

static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]{2,}").unwrap());

/// Convert an HTML document to readable plain text.
pub fn html_to_text(html: &str) -> String {
    let mut s = html.to_string();
    for re in RE_DROP_ELEMENTS.iter() {
        s = re.replace_all(&s, "").into_owned();
    }
    let s = RE_COMMENT.replace_all(&s, "");
    let s = RE_BLOCK_TAG.replace_all(&s, "\n");
    let s = RE_ANY_TAG.replace_all(&s, "");
    let s = decode_entities(&s);
    let s = RE_SPACES.replace_all(&s, " ");

    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Heuristic used when no `Content-Type` is available (curl fallback):
/// an `<html` tag within the first 1000 characters.
pub fn looks_like_html(content: &str) -> bool {
    let head: String = content.chars().take(1000).collect();
    head.to_lowercase().contains("<html")
}

fn decode_entities(input: &str) -> String {
    RE_ENTITY
        .replace_all(input, |caps: &Captures<'_>| {
            let body = &caps[1];
            let decoded = if let Some(num) = body.strip_prefix('#') {
                let code = match num.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32).map(String::from)
            } else {
                named_entity(body).map(String::from)
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "–",
        "mdash" => "—",
        "hellip" => "…",
        "copy" => "©",
        "reg" => "®",
        "laquo" => "«",
        "raquo" => "»",
        "lsquo" => "‘",
        "rsquo" => "’",
        "ldquo" => "“",
        "rdquo" => "”",
        _ => return None,
    })
}
