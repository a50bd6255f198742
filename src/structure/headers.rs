//! Header extraction: per-variant line rules producing a flat header list.
//!
//! Each [`FormatVariant`] owns a [`RuleSet`]: an ordered list of line rules
//! plus a `multi_match` flag. With `multi_match` off, the first rule that
//! matches a line claims it and later rules are skipped. With it on (only
//! structured markup), every matching rule yields its own header, so
//! `\chapter{A} \section{B}` on one line produces two headers.

use crate::structure::detect::FormatVariant;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A detected structural marker line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// 1-based line number.
    pub line: usize,
    /// Nesting level, 1 = highest.
    pub level: usize,
    pub text: String,
}

/// A line rule: `Some((level, text))` when the line is a header.
type Rule = fn(&str) -> Option<(usize, String)>;

/// Ordered rules for one format variant.
pub struct RuleSet {
    rules: &'static [Rule],
    multi_match: bool,
}

impl RuleSet {
    /// Headers produced by a single line.
    fn apply(&self, line_no: usize, line: &str, out: &mut Vec<Header>) {
        for rule in self.rules {
            if let Some((level, text)) = rule(line) {
                out.push(Header {
                    line: line_no,
                    level,
                    text,
                });
                if !self.multi_match {
                    return;
                }
            }
        }
    }
}

const MARKDOWN_RULES: RuleSet = RuleSet {
    rules: &[markdown_heading],
    multi_match: false,
};

const MARKUP_RULES: RuleSet = RuleSet {
    rules: &[markup_chapter, markup_section, markup_subsection],
    multi_match: true,
};

const BOOK_RULES: RuleSet = RuleSet {
    rules: &[book_chapter, book_numbered, book_subnumbered],
    multi_match: false,
};

const PLAIN_RULES: RuleSet = RuleSet {
    rules: &[plain_upper_case, plain_label],
    multi_match: false,
};

impl FormatVariant {
    /// The rule set used to extract headers for this variant.
    pub fn rules(&self) -> &'static RuleSet {
        match self {
            FormatVariant::Markdown => &MARKDOWN_RULES,
            FormatVariant::StructuredMarkup => &MARKUP_RULES,
            FormatVariant::NumberedBook => &BOOK_RULES,
            FormatVariant::Plain => &PLAIN_RULES,
        }
    }
}

/// Extract every header in `text`, in line order. No cap is applied.
pub fn extract_headers(text: &str, variant: FormatVariant) -> Vec<Header> {
    let rules = variant.rules();
    let mut headers = Vec::new();
    for (i, line) in text.lines().enumerate() {
        rules.apply(i + 1, line, &mut headers);
    }
    debug!("Extracted {} {} headers", headers.len(), variant);
    headers
}

// ── Markdown ─────────────────────────────────────────────────────────────

static RE_MD_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

fn markdown_heading(line: &str) -> Option<(usize, String)> {
    let caps = RE_MD_HEADING.captures(line)?;
    Some((caps[1].len(), caps[2].trim().to_string()))
}

// ── Structured markup ────────────────────────────────────────────────────

static RE_MARKUP_CHAPTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\chapter\{([^}]+)\}").unwrap());
static RE_MARKUP_SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\section\{([^}]+)\}").unwrap());
static RE_MARKUP_SUBSECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\subsection\{([^}]+)\}").unwrap());

fn markup_declaration(re: &Regex, level: usize, line: &str) -> Option<(usize, String)> {
    let caps = re.captures(line)?;
    Some((level, caps[1].trim().to_string()))
}

fn markup_chapter(line: &str) -> Option<(usize, String)> {
    markup_declaration(&RE_MARKUP_CHAPTER, 1, line)
}

fn markup_section(line: &str) -> Option<(usize, String)> {
    markup_declaration(&RE_MARKUP_SECTION, 2, line)
}

fn markup_subsection(line: &str) -> Option<(usize, String)> {
    markup_declaration(&RE_MARKUP_SUBSECTION, 3, line)
}

// ── Numbered book ────────────────────────────────────────────────────────

static RE_BOOK_CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Chapter|CHAPTER)\s+(\d+|[IVXLC]+)[:.]?\s*(.*)$").unwrap());
static RE_BOOK_NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.\s+([A-Z][^.]+)$").unwrap());
static RE_BOOK_SUBNUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+\.\d+)\s+(.+)$").unwrap());

fn book_chapter(line: &str) -> Option<(usize, String)> {
    let caps = RE_BOOK_CHAPTER.captures(line.trim())?;
    let text = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    Some((1, text.trim().to_string()))
}

fn book_numbered(line: &str) -> Option<(usize, String)> {
    let caps = RE_BOOK_NUMBERED.captures(line.trim())?;
    Some((2, caps[2].trim().to_string()))
}

fn book_subnumbered(line: &str) -> Option<(usize, String)> {
    let caps = RE_BOOK_SUBNUMBERED.captures(line.trim())?;
    Some((3, caps[2].trim().to_string()))
}

// ── Plain ────────────────────────────────────────────────────────────────

/// At least one cased character and no lower-case ones.
fn is_upper_case(s: &str) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

fn plain_upper_case(line: &str) -> Option<(usize, String)> {
    let s = line.trim();
    let len = s.chars().count();
    if (4..100).contains(&len) && is_upper_case(s) {
        Some((1, s.trim_end_matches(':').to_string()))
    } else {
        None
    }
}

fn plain_label(line: &str) -> Option<(usize, String)> {
    let s = line.trim();
    let label = s.strip_suffix(':')?;
    if s.chars().count() >= 80 {
        return None;
    }
    let mut letters = label.chars().filter(|c| *c != ' ').peekable();
    if letters.peek().is_none() || !letters.all(char::is_alphabetic) {
        return None;
    }
    Some((2, s.trim_end_matches(':').to_string()))
}
