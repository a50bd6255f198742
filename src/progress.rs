//! Progress-callback trait for per-page PDF text extraction.
//!
//! Inject an [`Arc<dyn ExtractProgressCallback>`] via
//! [`crate::config::ExtractConfigBuilder::progress_callback`] to receive
//! events as the extractor walks the selected pages. The extractor runs on a
//! blocking thread, so implementations must be `Send + Sync`.
//!
//! # Example
//!
//! ```rust
//! use docskim::{ExtractConfig, ExtractProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CharCounter {
//!     chars: AtomicUsize,
//! }
//!
//! impl ExtractProgressCallback for CharCounter {
//!     fn on_page_complete(&self, _page: usize, _total: usize, chars: usize) {
//!         self.chars.fetch_add(chars, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(CharCounter { chars: AtomicUsize::new(0) });
//! let config = ExtractConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the PDF extractor as it processes each selected page.
///
/// All methods default to no-ops.
pub trait ExtractProgressCallback: Send + Sync {
    /// Called once before the first page, with the number of selected pages.
    fn on_extraction_start(&self, selected_pages: usize) {
        let _ = selected_pages;
    }

    /// Called before a page's text is read.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `total_pages`: pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page's text was read (and possibly truncated).
    ///
    /// `chars` is the number of characters kept for the page.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// Called once at the end with the number of pages actually emitted,
    /// which is lower than selected when the character budget ran out.
    fn on_extraction_complete(&self, selected_pages: usize, emitted_pages: usize) {
        let _ = (selected_pages, emitted_pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractConfig`].
pub type ProgressCallback = Arc<dyn ExtractProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        chars: AtomicUsize,
        emitted: AtomicUsize,
    }

    impl ExtractProgressCallback for TrackingCallback {
        fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, chars: usize) {
            self.chars.fetch_add(chars, Ordering::SeqCst);
        }

        fn on_extraction_complete(&self, _selected: usize, emitted: usize) {
            self.emitted.store(emitted, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(3);
        cb.on_page_start(1, 10);
        cb.on_page_complete(1, 10, 42);
        cb.on_extraction_complete(3, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_page_start(1, 5);
        tracker.on_page_complete(1, 5, 100);
        tracker.on_page_start(2, 5);
        tracker.on_page_complete(2, 5, 250);
        tracker.on_extraction_complete(3, 2);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.chars.load(Ordering::SeqCst), 350);
        assert_eq!(tracker.emitted.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(10);
        cb.on_page_complete(1, 10, 512);
    }
}
