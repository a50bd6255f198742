//! Format detection: classify text into one structural convention.
//!
//! Detection patterns run in priority order and the first hit wins, so a
//! document with both `# Title` lines and `Chapter 1` lines is markdown.

use crate::error::SkimError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The structural conventions the header extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatVariant {
    /// `#`-prefixed headings.
    Markdown,
    /// Backslash declarations such as `\section{...}`.
    StructuredMarkup,
    /// `Chapter N`, `1. Title`, `1.2 Title`.
    NumberedBook,
    /// Upper-case lines and `Label:` lines.
    Plain,
}

impl FormatVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatVariant::Markdown => "markdown",
            FormatVariant::StructuredMarkup => "structured_markup",
            FormatVariant::NumberedBook => "numbered_book",
            FormatVariant::Plain => "plain",
        }
    }
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller's choice of format: detect it, or trust an explicit variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormatHint {
    /// Run the detector (default).
    #[default]
    Auto,
    /// Skip detection and use this variant as-is.
    Explicit(FormatVariant),
}

impl FormatHint {
    /// Resolve the hint against `text`.
    pub fn resolve(&self, text: &str) -> FormatVariant {
        match self {
            FormatHint::Auto => detect(text),
            FormatHint::Explicit(variant) => *variant,
        }
    }
}

impl FromStr for FormatHint {
    type Err = SkimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let variant = match s.trim().to_ascii_lowercase().as_str() {
            "auto" => return Ok(FormatHint::Auto),
            "markdown" | "md" => FormatVariant::Markdown,
            "structured_markup" | "structured-markup" | "latex" => FormatVariant::StructuredMarkup,
            "numbered_book" | "numbered-book" | "book" => FormatVariant::NumberedBook,
            "plain" => FormatVariant::Plain,
            _ => {
                return Err(SkimError::UnsupportedFormatHint {
                    hint: s.to_string(),
                })
            }
        };
        Ok(FormatHint::Explicit(variant))
    }
}

static RE_MARKDOWN_CUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s").unwrap());

static RE_MARKUP_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\\(section|chapter|title)\{").unwrap());

static RE_BOOK_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Chapter \d|^CHAPTER \d|^\d+\.\s+[A-Z]").unwrap());

/// Classify `text`. Falls back to [`FormatVariant::Plain`]; never fails.
pub fn detect(text: &str) -> FormatVariant {
    let variant = if RE_MARKDOWN_CUE.is_match(text) {
        FormatVariant::Markdown
    } else if RE_MARKUP_CUE.is_match(text) {
        FormatVariant::StructuredMarkup
    } else if RE_BOOK_CUE.is_match(text) {
        FormatVariant::NumberedBook
    } else {
        FormatVariant::Plain
    };
    debug!("Detected format: {}", variant);
    variant
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_heading() {
        assert_eq!(detect("intro\n## Setup\nbody"), FormatVariant::Markdown);
    }

    #[test]
    fn seven_hashes_is_not_markdown() {
        assert_eq!(detect("####### too deep"), FormatVariant::Plain);
    }

    #[test]
    fn hash_needs_whitespace() {
        assert_eq!(detect("#hashtag\nmore"), FormatVariant::Plain);
    }

    #[test]
    fn structured_markup_declaration() {
        let text = "\\documentclass{book}\n\\chapter{Origins}\ntext";
        assert_eq!(detect(text), FormatVariant::StructuredMarkup);
    }

    #[test]
    fn markup_declaration_must_start_the_line() {
        assert_eq!(detect("see \\section{Foo}"), FormatVariant::Plain);
    }

    #[test]
    fn numbered_book_variants() {
        assert_eq!(detect("Chapter 1\nIt began."), FormatVariant::NumberedBook);
        assert_eq!(detect("CHAPTER 12\n"), FormatVariant::NumberedBook);
        assert_eq!(detect("3. Results\n"), FormatVariant::NumberedBook);
        assert_eq!(detect("3. results\n"), FormatVariant::Plain);
    }

    #[test]
    fn priority_markdown_beats_book() {
        let text = "Chapter 1\n# Real heading\n";
        assert_eq!(detect(text), FormatVariant::Markdown);
    }

    #[test]
    fn priority_markup_beats_book() {
        let text = "Chapter 1\n\\section{A}\n";
        assert_eq!(detect(text), FormatVariant::StructuredMarkup);
    }

    #[test]
    fn empty_text_is_plain() {
        assert_eq!(detect(""), FormatVariant::Plain);
    }

    #[test]
    fn hint_parsing() {
        assert_eq!("auto".parse::<FormatHint>().unwrap(), FormatHint::Auto);
        assert_eq!(
            "latex".parse::<FormatHint>().unwrap(),
            FormatHint::Explicit(FormatVariant::StructuredMarkup)
        );
        assert_eq!(
            "numbered_book".parse::<FormatHint>().unwrap(),
            FormatHint::Explicit(FormatVariant::NumberedBook)
        );
        assert_eq!(
            "Plain".parse::<FormatHint>().unwrap(),
            FormatHint::Explicit(FormatVariant::Plain)
        );
    }

    #[test]
    fn unknown_hint_fails_fast() {
        let err = "asciidoc".parse::<FormatHint>().unwrap_err();
        assert!(matches!(err, SkimError::UnsupportedFormatHint { ref hint } if hint == "asciidoc"));
    }

    #[test]
    fn explicit_hint_is_trusted() {
        let hint = FormatHint::Explicit(FormatVariant::Plain);
        assert_eq!(hint.resolve("# Clearly markdown"), FormatVariant::Plain);
    }
}
