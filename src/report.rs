//! The structure report: everything the analysis found about one document.
//!
//! A [`StructureReport`] always carries the *full* header and section
//! lists. Caps from [`ReportLimits`] are applied by [`StructureReport::capped`]
//! and by the renderers in [`crate::render`], never during analysis.

use crate::config::ReportLimits;
use crate::extent::Extent;
use crate::error::SkimError;
use crate::sampling::SamplingPlan;
use crate::structure::{FormatHint, FormatVariant, Header, Section};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of document a report describes.
///
/// Serialises as a bare string: the variant name for text, `"pdf"` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DocumentFormat {
    /// A text document and the variant its headers were extracted with.
    Text(FormatVariant),
    /// A PDF; structure comes from its outline, not from header rules.
    Pdf,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Text(v) => write!(f, "{v}"),
            DocumentFormat::Pdf => f.write_str("pdf"),
        }
    }
}

impl From<DocumentFormat> for String {
    fn from(format: DocumentFormat) -> Self {
        format.to_string()
    }
}

impl TryFrom<String> for DocumentFormat {
    type Error = SkimError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "pdf" {
            return Ok(DocumentFormat::Pdf);
        }
        match s.parse::<FormatHint>()? {
            FormatHint::Explicit(variant) => Ok(DocumentFormat::Text(variant)),
            FormatHint::Auto => Err(SkimError::UnsupportedFormatHint { hint: s }),
        }
    }
}

/// Size counters for text documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCounts {
    pub chars: usize,
    pub words: usize,
}

impl TextCounts {
    pub fn of(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            words: text.split_whitespace().count(),
        }
    }
}

/// One PDF outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting level, 1 = top.
    pub level: usize,
    pub title: String,
    /// 1-indexed target page, when the bookmark points at one.
    pub page: Option<usize>,
}

/// Aggregate result of analysing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureReport {
    /// File path or other identifier the document was loaded from.
    pub identifier: String,
    pub format: DocumentFormat,
    pub extent: Extent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<TextCounts>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toc: Vec<TocEntry>,
    pub sampling: SamplingPlan,
}

impl StructureReport {
    /// A copy with header, section and TOC lists cut to the structured
    /// output caps.
    pub fn capped(&self, limits: &ReportLimits) -> Self {
        let mut out = self.clone();
        out.headers.truncate(limits.max_headers);
        out.sections.truncate(limits.max_sections);
        out.toc.truncate(limits.max_toc);
        out
    }

    /// Serialise the capped report as pretty JSON.
    pub fn to_json(&self, limits: &ReportLimits) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.capped(limits))
    }
}
