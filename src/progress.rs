//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! an event as the acquisition stage reaches each page. The CLI uses this
//! to drive its progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use bangla_pdf2txt::{ExtractionConfig, ExtractionProgressCallback, TextSource};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct OcrCounter {
//!     ocr_pages: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for OcrCounter {
//!     fn on_page_complete(&self, _page: usize, _total: usize, source: TextSource, _chars: usize) {
//!         if source == TextSource::Ocr {
//!             self.ocr_pages.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let counter = Arc::new(OcrCounter { ocr_pages: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::TextSource;
use std::sync::Arc;

/// Called by the acquisition stage as it processes each page.
///
/// Pages are processed strictly in order on a single thread, but the
/// pipeline itself runs on a blocking worker, so implementations must be
/// `Send + Sync`. All methods default to no-ops.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before the first page, with the number of selected pages.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page's text layer is read.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — number of selected pages
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page produced its text.
    ///
    /// # Arguments
    /// * `source` — whether the text came from the embedded layer or OCR
    /// * `chars`  — character count of the page text
    fn on_page_complete(&self, page_num: usize, total_pages: usize, source: TextSource, chars: usize) {
        let _ = (page_num, total_pages, source, chars);
    }

    /// Called once after normalisation, when the output is ready.
    fn on_extraction_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
