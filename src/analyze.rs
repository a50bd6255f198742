//! Library entry points: analyse, extract and fetch.
//!
//! [`analyze_text`] is the pure core: detection, header extraction, section
//! building and sampling over a string already in memory. The async
//! functions resolve their input through [`crate::pipeline`] first and then
//! either hand text to the core or plan over a page or character extent.

use crate::config::{AnalysisConfig, ExtractConfig, FetchConfig};
use crate::error::SkimError;
use crate::extent::Extent;
use crate::pipeline::fetch::{self, FetchInfo, FetchedContent};
use crate::pipeline::pdf::{self, PdfExtraction, PdfMetadata};
use crate::pipeline::input;
use crate::report::{DocumentFormat, StructureReport, TextCounts};
use crate::sampling::{plan_extent, PaddingPolicy, SamplingPlan, DEFAULT_CHUNK_COUNT};
use crate::structure::{build_sections, extract_headers};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// PDF metadata together with a page sampling plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfInfo {
    pub path: String,
    pub metadata: PdfMetadata,
    pub sampling: SamplingPlan,
}

/// Fetch details together with a character sampling plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlInspection {
    pub info: FetchInfo,
    pub extent: Extent,
    pub sampling: SamplingPlan,
}

/// Analyse a text document held in memory.
///
/// Never fails on degenerate input: empty text yields a zero-line report.
///
/// Lines are counted with [`str::lines`]: a trailing newline does not open
/// an extra empty line, so `"a\nb\n"` and `"a\nb"` both have 2 lines and `""`
/// has 0. Splitting on every `'\n'` instead would report one more line for
/// newline-terminated files (and 1 for empty text); sampling windows and the
/// last section's `end_line` follow the [`str::lines`] count.
///
/// # Example
/// ```rust
/// use docskim::{analyze_text, AnalysisConfig};
///
/// let text = "# Intro\nhello\n## Details\nmore\nmore";
/// let report = analyze_text(text, "notes.md", &AnalysisConfig::default()).unwrap();
/// assert_eq!(report.headers.len(), 2);
/// assert_eq!(report.sections[1].line_count, 3);
///
/// let terminated = analyze_text("a\nb\n", "t.txt", &AnalysisConfig::default()).unwrap();
/// assert_eq!(terminated.extent.total, 2);
/// ```
pub fn analyze_text(
    text: &str,
    identifier: impl Into<String>,
    config: &AnalysisConfig,
) -> Result<StructureReport, SkimError> {
    let identifier = identifier.into();
    let variant = config.format_hint.resolve(text);
    let headers = extract_headers(text, variant);
    let total_lines = text.lines().count();
    let sections = build_sections(&headers, total_lines);
    let sampling = plan_extent(total_lines, &PaddingPolicy::lines(), config.chunk_count)?;

    info!(
        "Analysed {}: {} ({} lines, {} headers)",
        identifier,
        variant,
        total_lines,
        headers.len()
    );

    Ok(StructureReport {
        identifier,
        format: DocumentFormat::Text(variant),
        extent: Extent::lines(total_lines),
        counts: Some(TextCounts::of(text)),
        headers,
        sections,
        toc: Vec::new(),
        sampling,
    })
}

/// Analyse a local file. Paths ending in `.pdf` go to [`analyze_pdf`];
/// anything else is read as (lossily decoded) text.
pub async fn analyze_path(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<StructureReport, SkimError> {
    let path = path.as_ref();
    if input::has_pdf_extension(path) {
        return analyze_pdf(path, config, None).await;
    }
    let text = input::read_text(path).await?;
    analyze_text(&text, path.display().to_string(), config)
}

/// Synchronous wrapper around [`analyze_path`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_path_sync(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<StructureReport, SkimError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SkimError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze_path(path, config))
}

/// Analyse a PDF: page extent, outline and a page sampling plan.
///
/// PDFs skip format detection; their structure is the outline.
pub async fn analyze_pdf(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
    password: Option<&str>,
) -> Result<StructureReport, SkimError> {
    let path = input::resolve_pdf(path.as_ref())?;
    let outline = pdf::read_outline(&path, password).await?;
    let sampling = plan_extent(outline.page_count, &PaddingPolicy::pages(), config.chunk_count)?;

    Ok(StructureReport {
        identifier: path.display().to_string(),
        format: DocumentFormat::Pdf,
        extent: Extent::pages(outline.page_count),
        counts: None,
        headers: Vec::new(),
        sections: Vec::new(),
        toc: outline.toc,
        sampling,
    })
}

/// Extract page text from a PDF under a character budget.
pub async fn extract_pdf(
    path: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<PdfExtraction, SkimError> {
    let path = input::resolve_pdf(path.as_ref())?;
    pdf::extract_text(&path, config).await
}

/// PDF metadata plus the recommended page sampling plan.
pub async fn pdf_info(path: impl AsRef<Path>, password: Option<&str>) -> Result<PdfInfo, SkimError> {
    let path = input::resolve_pdf(path.as_ref())?;
    let metadata = pdf::read_metadata(&path, password).await?;
    let sampling = plan_extent(metadata.page_count, &PaddingPolicy::pages(), DEFAULT_CHUNK_COUNT)?;
    Ok(PdfInfo {
        path: path.display().to_string(),
        metadata,
        sampling,
    })
}

/// Fetch a URL as text, honouring the configured offset and limit.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<FetchedContent, SkimError> {
    fetch::fetch(url, config).await
}

/// Fetch a URL and plan character windows over its text.
///
/// The plan covers the whole converted text regardless of `config.start`
/// and `config.max_chars`.
pub async fn inspect_url(url: &str, config: &FetchConfig) -> Result<UrlInspection, SkimError> {
    let fetched = fetch::fetch(url, config).await?;
    inspection_of(fetched.info)
}

fn inspection_of(info: FetchInfo) -> Result<UrlInspection, SkimError> {
    let total = if info.text_length > 0 {
        info.text_length
    } else {
        info.content_length.map_or(0, |n| n as usize)
    };
    debug!("Planning {} chars for {}", total, info.url);
    let extent = Extent::characters(total);
    let sampling = plan_extent(total, &PaddingPolicy::characters(), DEFAULT_CHUNK_COUNT)?;
    Ok(UrlInspection {
        info,
        extent,
        sampling,
    })
}
