//! PDF access via pdfium: page count, outline, metadata and page text.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! Every public function here moves its work onto the blocking pool with
//! `tokio::task::spawn_blocking`, and each blocking call binds and loads the
//! document afresh on that thread.
//!
//! ## Binding
//!
//! `PDFIUM_LIB_PATH` may name the library file itself or the directory that
//! contains it. Without it, the platform's default library search is used.

use crate::config::ExtractConfig;
use crate::error::SkimError;
use crate::progress::ProgressCallback;
use crate::report::TocEntry;
use pdfium_render::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outline entries beyond this are ignored; malformed outlines can loop.
const MAX_OUTLINE_ENTRIES: usize = 10_000;

/// Characters charged against the extraction budget for each page banner.
pub const PAGE_BANNER_COST: usize = 100;

/// Page count and outline: what structure analysis needs from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfOutline {
    pub page_count: usize,
    pub toc: Vec<TocEntry>,
}

/// Document information dictionary plus page count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
}

/// Text of one extracted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page: usize,
    pub text: String,
    /// The page text was cut to fit the remaining budget.
    pub truncated: bool,
}

/// Result of [`extract_text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfExtraction {
    pub total_pages: usize,
    /// Pages requested after clamping to the document, in order.
    pub selected: Vec<usize>,
    /// Pages actually emitted; a prefix of `selected`.
    pub pages: Vec<PageText>,
    /// Extraction stopped before the last selected page.
    pub limit_reached: bool,
    /// Budget characters used, banners included.
    pub char_count: usize,
    pub max_chars: usize,
}

impl PdfExtraction {
    /// Share of the document's pages that were emitted, in percent.
    pub fn coverage_percent(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        self.pages.len() as f64 / self.total_pages as f64 * 100.0
    }
}

// ── Binding and loading ──────────────────────────────────────────────────

fn bind_pdfium() -> Result<Pdfium, SkimError> {
    if let Ok(raw) = std::env::var("PDFIUM_LIB_PATH") {
        let pb = PathBuf::from(&raw);
        let lib_path = if pb.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(&pb)
        } else {
            pb
        };
        debug!("Binding pdfium from {}", lib_path.display());
        return Pdfium::bind_to_library(&lib_path)
            .map(Pdfium::new)
            .map_err(|e| SkimError::PdfiumBindingFailed(format!("{}: {:?}", lib_path.display(), e)));
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| SkimError::PdfiumBindingFailed(format!("{:?}", e)))
}

fn load<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, SkimError> {
    pdfium.load_pdf_from_file(path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                SkimError::WrongPassword {
                    path: path.to_path_buf(),
                }
            } else {
                SkimError::PasswordRequired {
                    path: path.to_path_buf(),
                }
            }
        } else {
            SkimError::CorruptPdf {
                path: path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

async fn blocking<T, F>(what: &str, f: F) -> Result<T, SkimError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SkimError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SkimError::Internal(format!("{} task panicked: {}", what, e)))?
}

// ── Outline ──────────────────────────────────────────────────────────────

/// Read the page count and the bookmark tree.
pub async fn read_outline(path: &Path, password: Option<&str>) -> Result<PdfOutline, SkimError> {
    let path = path.to_path_buf();
    let pwd = password.map(str::to_string);
    blocking("Outline", move || read_outline_blocking(&path, pwd.as_deref())).await
}

fn read_outline_blocking(path: &Path, password: Option<&str>) -> Result<PdfOutline, SkimError> {
    let pdfium = bind_pdfium()?;
    let document = load(&pdfium, path, password)?;
    let page_count = document.pages().len() as usize;

    let mut toc = Vec::new();
    let mut stack: Vec<(PdfBookmark<'_>, usize)> = Vec::new();
    if let Some(root) = document.bookmarks().root() {
        stack.push((root, 1));
    }

    // Pre-order: a node, then its children, then its next sibling.
    while let Some((bookmark, level)) = stack.pop() {
        if toc.len() >= MAX_OUTLINE_ENTRIES {
            warn!("Outline truncated at {} entries", MAX_OUTLINE_ENTRIES);
            break;
        }
        toc.push(TocEntry {
            level,
            title: bookmark.title().unwrap_or_default().trim().to_string(),
            page: bookmark
                .destination()
                .and_then(|d| d.page_index().ok())
                .map(|idx| idx as usize + 1),
        });
        if let Some(sibling) = bookmark.next_sibling() {
            stack.push((sibling, level));
        }
        if let Some(child) = bookmark.first_child() {
            stack.push((child, level + 1));
        }
    }

    info!("PDF loaded: {} pages, {} outline entries", page_count, toc.len());
    Ok(PdfOutline { page_count, toc })
}

// ── Metadata ─────────────────────────────────────────────────────────────

/// Extract document metadata without reading page text.
pub async fn read_metadata(path: &Path, password: Option<&str>) -> Result<PdfMetadata, SkimError> {
    let path = path.to_path_buf();
    let pwd = password.map(str::to_string);
    blocking("Metadata", move || read_metadata_blocking(&path, pwd.as_deref())).await
}

fn read_metadata_blocking(path: &Path, password: Option<&str>) -> Result<PdfMetadata, SkimError> {
    let pdfium = bind_pdfium()?;
    let document = load(&pdfium, path, password)?;
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().trim().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(PdfMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        page_count: document.pages().len() as usize,
    })
}

// ── Page text ────────────────────────────────────────────────────────────

/// Extract the text of the selected pages under a character budget.
pub async fn extract_text(path: &Path, config: &ExtractConfig) -> Result<PdfExtraction, SkimError> {
    let path = path.to_path_buf();
    let config = config.clone();
    blocking("Extraction", move || {
        let pdfium = bind_pdfium()?;
        let document = load(&pdfium, &path, config.password.as_deref())?;
        let pages = document.pages();
        let total_pages = pages.len() as usize;
        let selected = config.pages.to_pages(total_pages);

        let read_page = |page: usize| -> Result<String, SkimError> {
            let corrupt = |e: PdfiumError| SkimError::CorruptPdf {
                path: path.clone(),
                detail: format!("page {}: {:?}", page, e),
            };
            let p = pages.get((page - 1) as PdfPageIndex).map_err(corrupt)?;
            let text = p.text().map_err(corrupt)?;
            Ok(text.all())
        };

        budgeted(
            total_pages,
            selected,
            config.max_chars,
            config.progress_callback.as_ref(),
            read_page,
        )
    })
    .await
}

/// Walk `selected` pages, reading each through `read_page`, until the budget
/// is spent.
///
/// Before each page, if `char_count >= max_chars` the walk stops. A page
/// longer than the remaining budget is cut to fit. Each emitted page then
/// charges its kept characters plus [`PAGE_BANNER_COST`].
fn budgeted<F>(
    total_pages: usize,
    selected: Vec<usize>,
    max_chars: usize,
    progress: Option<&ProgressCallback>,
    mut read_page: F,
) -> Result<PdfExtraction, SkimError>
where
    F: FnMut(usize) -> Result<String, SkimError>,
{
    if let Some(cb) = progress {
        cb.on_extraction_start(selected.len());
    }

    let mut pages = Vec::with_capacity(selected.len());
    let mut char_count = 0usize;
    let mut limit_reached = false;

    for &page in &selected {
        if char_count >= max_chars {
            limit_reached = true;
            break;
        }
        if let Some(cb) = progress {
            cb.on_page_start(page, total_pages);
        }

        let text = read_page(page)?;
        let remaining = max_chars - char_count;
        let (text, truncated) = match text.char_indices().nth(remaining) {
            Some((cut, _)) => (text[..cut].to_string(), true),
            None => (text, false),
        };
        let kept = text.chars().count();
        char_count += kept + PAGE_BANNER_COST;
        debug!("Page {} → {} chars (truncated={})", page, kept, truncated);

        if let Some(cb) = progress {
            cb.on_page_complete(page, total_pages, kept);
        }
        pages.push(PageText {
            page,
            text,
            truncated,
        });
    }

    if let Some(cb) = progress {
        cb.on_extraction_complete(selected.len(), pages.len());
    }
    info!(
        "Extracted {} of {} selected pages (~{} chars)",
        pages.len(),
        selected.len(),
        char_count
    );

    Ok(PdfExtraction {
        total_pages,
        selected,
        pages,
        limit_reached,
        char_count,
        max_chars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ExtractProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fake_page(page: usize) -> Result<String, SkimError> {
        Ok(format!("page {page} ").repeat(10))
    }

    #[test]
    fn everything_fits() {
        let out = budgeted(5, vec![1, 2, 3], 10_000, None, fake_page).unwrap();
        assert_eq!(out.pages.len(), 3);
        assert!(!out.limit_reached);
        assert!(out.pages.iter().all(|p| !p.truncated));
        assert_eq!(out.char_count, 3 * (70 + PAGE_BANNER_COST));
        assert!((out.coverage_percent() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn page_cut_to_remaining_budget() {
        let out = budgeted(5, vec![1, 2], 30, None, fake_page).unwrap();
        // Page 1 is cut to 30 chars; its banner then exhausts the budget.
        assert_eq!(out.pages.len(), 1);
        assert!(out.pages[0].truncated);
        assert_eq!(out.pages[0].text.chars().count(), 30);
        assert!(out.limit_reached);
        assert_eq!(out.char_count, 130);
    }

    #[test]
    fn banner_cost_counts_against_budget() {
        // 70 + 100 = 170 after page 1, so page 2 still starts under 200.
        let out = budgeted(3, vec![1, 2, 3], 200, None, fake_page).unwrap();
        assert_eq!(out.pages.len(), 2);
        assert_eq!(out.pages[1].text.chars().count(), 30);
        assert!(out.pages[1].truncated);
        assert!(out.limit_reached);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let out = budgeted(1, vec![1], 3, None, |_| Ok("äöüß".to_string())).unwrap();
        assert_eq!(out.pages[0].text, "äöü");
    }

    #[test]
    fn empty_selection() {
        let out = budgeted(0, Vec::new(), 100, None, fake_page).unwrap();
        assert!(out.pages.is_empty());
        assert!(!out.limit_reached);
        assert_eq!(out.coverage_percent(), 0.0);
    }

    #[test]
    fn read_errors_propagate() {
        let err = budgeted(2, vec![1, 2], 1000, None, |p| {
            if p == 2 {
                Err(SkimError::Internal("boom".into()))
            } else {
                Ok(String::new())
            }
        })
        .unwrap_err();
        assert!(matches!(err, SkimError::Internal(_)));
    }

    #[derive(Default)]
    struct Counter {
        started: AtomicUsize,
        pages: AtomicUsize,
        emitted: AtomicUsize,
    }

    impl ExtractProgressCallback for Counter {
        fn on_extraction_start(&self, selected: usize) {
            self.started.store(selected, Ordering::SeqCst);
        }
        fn on_page_complete(&self, _page: usize, _total: usize, _chars: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }
        fn on_extraction_complete(&self, _selected: usize, emitted: usize) {
            self.emitted.store(emitted, Ordering::SeqCst);
        }
    }

    #[test]
    fn progress_events_fire() {
        let counter = Arc::new(Counter::default());
        let cb: ProgressCallback = counter.clone();
        budgeted(4, vec![1, 2, 3, 4], 200, Some(&cb), fake_page).unwrap();
        assert_eq!(counter.started.load(Ordering::SeqCst), 4);
        assert_eq!(counter.pages.load(Ordering::SeqCst), 2);
        assert_eq!(counter.emitted.load(Ordering::SeqCst), 2);
    }
}
