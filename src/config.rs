//! Configuration types for analysis, PDF extraction and URL fetching.
//!
//! Each entry point takes one config struct built via its builder, the same
//! way across the crate: documented defaults, chainable setters, and a
//! validating `build()`.

use crate::error::SkimError;
use crate::extent::Window;
use crate::progress::ProgressCallback;
use crate::sampling::DEFAULT_CHUNK_COUNT;
use crate::structure::FormatHint;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Report limits ────────────────────────────────────────────────────────

/// Presentation caps. The analysis itself is never truncated; these only
/// apply when a report is serialised or printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLimits {
    /// Headers kept in structured (JSON) output. Default: 50.
    pub max_headers: usize,
    /// Sections kept in structured output. Default: 30.
    pub max_sections: usize,
    /// TOC entries kept in structured output. Default: 30.
    pub max_toc: usize,
    /// Headers listed in the human-readable report. Default: 20.
    pub display_headers: usize,
    /// Sections listed in the human-readable report. Default: 15.
    pub display_sections: usize,
    /// TOC entries listed in the human-readable report. Default: 20.
    pub display_toc: usize,
    /// Section names are cut to this many characters when printed. Default: 50.
    pub display_name_width: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            max_headers: 50,
            max_sections: 30,
            max_toc: 30,
            display_headers: 20,
            display_sections: 15,
            display_toc: 20,
            display_name_width: 50,
        }
    }
}

// ── Analysis ─────────────────────────────────────────────────────────────

/// Configuration for structure analysis of a text or PDF document.
///
/// # Example
/// ```rust
/// use docskim::{AnalysisConfig, FormatHint};
///
/// let config = AnalysisConfig::builder()
///     .format_hint("markdown".parse::<FormatHint>().unwrap())
///     .chunk_count(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.chunk_count, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Format hint. Default: [`FormatHint::Auto`] (run the detector).
    pub format_hint: FormatHint,
    /// Number of uniform chunks in the sampling plan. Default: 6.
    pub chunk_count: usize,
    /// Presentation caps.
    pub limits: ReportLimits,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            format_hint: FormatHint::Auto,
            chunk_count: DEFAULT_CHUNK_COUNT,
            limits: ReportLimits::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn format_hint(mut self, hint: FormatHint) -> Self {
        self.config.format_hint = hint;
        self
    }

    pub fn chunk_count(mut self, n: usize) -> Self {
        self.config.chunk_count = n;
        self
    }

    pub fn limits(mut self, limits: ReportLimits) -> Self {
        self.config.limits = limits;
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, SkimError> {
        if self.config.chunk_count == 0 {
            return Err(SkimError::InvalidConfig("chunk count must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

// ── PDF extraction ───────────────────────────────────────────────────────

/// Which pages of a PDF to extract text from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// The first N pages (default: 10).
    FirstPages(usize),
    /// Inclusive 1-indexed page ranges, possibly overlapping.
    Ranges(Vec<Window>),
}

impl Default for PageSelection {
    fn default() -> Self {
        PageSelection::FirstPages(10)
    }
}

impl PageSelection {
    /// Expand into a sorted, deduplicated list of 1-indexed page numbers
    /// within `1..=total_pages`.
    pub fn to_pages(&self, total_pages: usize) -> Vec<usize> {
        let mut pages: Vec<usize> = match self {
            PageSelection::FirstPages(n) => (1..=(*n).min(total_pages)).collect(),
            PageSelection::Ranges(ranges) => ranges
                .iter()
                .flat_map(|w| w.start.max(1)..=w.end.min(total_pages))
                .collect(),
        };
        pages.sort_unstable();
        pages.dedup();
        pages
    }
}

/// Configuration for PDF page text extraction.
#[derive(Clone)]
pub struct ExtractConfig {
    /// Page selection. Default: first 10 pages.
    pub pages: PageSelection,
    /// Approximate output budget in characters. Default: 10 000.
    ///
    /// Each page banner counts 100 characters against the budget, so the
    /// limit bounds the rendered output rather than only the page text.
    pub max_chars: usize,
    /// PDF user password for encrypted documents.
    pub password: Option<String>,
    /// Per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            pages: PageSelection::default(),
            max_chars: 10_000,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractConfig")
            .field("pages", &self.pages)
            .field("max_chars", &self.max_chars)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractConfig {
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractConfig`].
#[derive(Debug)]
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
}

impl ExtractConfigBuilder {
    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn max_chars(mut self, n: usize) -> Self {
        self.config.max_chars = n;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn build(self) -> Result<ExtractConfig, SkimError> {
        if let PageSelection::Ranges(ref ranges) = self.config.pages {
            if let Some(bad) = ranges.iter().find(|w| w.start == 0 || w.is_empty()) {
                return Err(SkimError::InvalidConfig(format!(
                    "page range {bad} is invalid: pages are 1-indexed and start must be <= end"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── URL fetching ─────────────────────────────────────────────────────────

/// User agent sent by the HTTP client.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; DocumentSkimmer/1.0)";

/// User agent passed to the curl fallback.
pub const CURL_USER_AGENT: &str = "DocumentSkimmer/1.0";

/// Configuration for fetching a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum characters of content returned. Default: 10 000.
    pub max_chars: usize,
    /// Character offset to start from (after HTML stripping). Default: 0.
    pub start: usize,
    /// Timeout for the HEAD request. Default: 10.
    pub head_timeout_secs: u64,
    /// Timeout for the GET. Default: 30.
    pub get_timeout_secs: u64,
    /// `--max-time` for curl; the subprocess gets 5 s on top. Default: 30.
    pub curl_timeout_secs: u64,
    /// User agent for the HTTP client.
    pub user_agent: String,
    /// Retry with the `curl` CLI when the HTTP client fails. Default: true.
    pub curl_fallback: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_chars: 10_000,
            start: 0,
            head_timeout_secs: 10,
            get_timeout_secs: 30,
            curl_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            curl_fallback: true,
        }
    }
}

impl FetchConfig {
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`FetchConfig`].
#[derive(Debug)]
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfigBuilder {
    pub fn max_chars(mut self, n: usize) -> Self {
        self.config.max_chars = n;
        self
    }

    pub fn start(mut self, offset: usize) -> Self {
        self.config.start = offset;
        self
    }

    pub fn head_timeout_secs(mut self, secs: u64) -> Self {
        self.config.head_timeout_secs = secs;
        self
    }

    pub fn get_timeout_secs(mut self, secs: u64) -> Self {
        self.config.get_timeout_secs = secs;
        self
    }

    pub fn curl_timeout_secs(mut self, secs: u64) -> Self {
        self.config.curl_timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn curl_fallback(mut self, v: bool) -> Self {
        self.config.curl_fallback = v;
        self
    }

    pub fn build(self) -> Result<FetchConfig, SkimError> {
        let c = &self.config;
        if c.get_timeout_secs == 0 || c.head_timeout_secs == 0 || c.curl_timeout_secs == 0 {
            return Err(SkimError::InvalidConfig("timeouts must be ≥ 1 second".into()));
        }
        Ok(self.config)
    }
}
