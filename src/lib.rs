//! # docskim
//!
//! Skim large documents: find their structure and plan which windows of
//! lines, pages or characters to read.
//!
//! ## Why this crate?
//!
//! A 5,000-line log, a 400-page PDF or a long web page rarely fits in one
//! read. Before reading anything, docskim answers two questions cheaply:
//! *what is the shape of this document?* (headers, sections, outline) and
//! *which slices are worth reading first?* (beginning, quartile marks, end,
//! and an even chunk division). It then prints the shell commands that fetch
//! exactly those slices.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document
//!  │
//!  ├─ 1. Input     read text (lossy UTF-8) │ open PDF via pdfium │ fetch URL
//!  ├─ 2. Detect    markdown / structured markup / numbered book / plain
//!  ├─ 3. Headers   per-variant line rules → (line, level, text)
//!  ├─ 4. Sections  partition lines at header boundaries
//!  ├─ 5. Sample    beginning / 25% / 50% / 75% / end + N chunks
//!  └─ 6. Report    JSON or a terminal report with suggested commands
//! ```
//!
//! PDFs skip steps 2–4: their structure is the bookmark outline, and the
//! sampling unit is pages. URLs plan over characters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docskim::{analyze_path, render, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::default();
//!     let report = analyze_path("notes.md", &config).await?;
//!     println!("{}", render::render_report(&report, &config.limits));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docskim` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docskim = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDF support
//!
//! PDF functions bind pdfium at call time. Set `PDFIUM_LIB_PATH` to the
//! library file or its directory, or install libpdfium where the system
//! loader finds it. Text analysis and URL fetching never touch pdfium.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod extent;
pub mod pipeline;
pub mod progress;
pub mod render;
pub mod report;
pub mod sampling;
pub mod structure;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{
    analyze_path, analyze_path_sync, analyze_pdf, analyze_text, extract_pdf, fetch_url,
    inspect_url, pdf_info, PdfInfo, UrlInspection,
};
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, ExtractConfig, ExtractConfigBuilder, FetchConfig,
    FetchConfigBuilder, PageSelection, ReportLimits,
};
pub use error::SkimError;
pub use extent::{Extent, Unit, Window};
pub use pipeline::fetch::{FetchInfo, FetchMethod, FetchedContent};
pub use pipeline::pdf::{PageText, PdfExtraction, PdfMetadata};
pub use progress::{ExtractProgressCallback, NoopProgressCallback, ProgressCallback};
pub use report::{DocumentFormat, StructureReport, TextCounts, TocEntry};
pub use sampling::{plan, Pad, PaddingPolicy, SamplingPlan, DEFAULT_CHUNK_COUNT};
pub use structure::{
    build_sections, detect, extract_headers, FormatHint, FormatVariant, Header, Section,
};
