//! Page text acquisition: embedded text layer first, OCR as the fallback.
//!
//! For each selected page, in order:
//!
//! ```text
//! embedded text ──▶ long enough? ──yes──▶ use verbatim
//!                        │
//!                        no
//!                        ▼
//!        render @ dpi ──▶ temp PNG ──▶ OCR ──▶ delete temp PNG
//! ```
//!
//! Both collaborators are traits. [`crate::pipeline::render::PdfiumDocument`]
//! and [`crate::pipeline::ocr::TesseractEngine`] are the production
//! implementations; tests drive the same code with in-memory stubs.
//!
//! Errors from either collaborator abort the run. Nothing is retried and no
//! partial text is returned.

use crate::config::{ExtractionConfig, OcrPolicy};
use crate::error::ExtractError;
use crate::output::{PageText, TextSource};
use crate::pipeline::ocr::OcrEngine;
use image::{DynamicImage, ImageFormat};
use std::io::{BufWriter, Write};
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Separator appended after every page's contribution to the raw text.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// A paginated document that can report its text layer and render pages.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Embedded text of the page at 0-based `index` (may be empty).
    fn embedded_text(&self, index: usize) -> Result<String, ExtractError>;

    /// Rasterise the page at 0-based `index` at `dpi`.
    fn render(&self, index: usize, dpi: u32) -> Result<DynamicImage, ExtractError>;
}

/// Text collected from all selected pages.
#[derive(Debug, Clone, Default)]
pub struct Acquisition {
    /// Per-page texts in page order.
    pub pages: Vec<PageText>,
    /// Page texts concatenated, each followed by [`PAGE_SEPARATOR`].
    pub raw_text: String,
}

/// Whether a page with this embedded text should be OCR'd instead.
pub fn needs_ocr(embedded: &str, config: &ExtractionConfig) -> bool {
    match config.ocr_policy {
        OcrPolicy::Always => true,
        OcrPolicy::Never => false,
        OcrPolicy::Auto => embedded.trim().chars().count() <= config.min_text_chars,
    }
}

/// Acquire text for every page selected by `config.pages`.
pub fn acquire_text<S, O>(
    source: &S,
    ocr: &O,
    config: &ExtractionConfig,
) -> Result<Acquisition, ExtractError>
where
    S: PageSource + ?Sized,
    O: OcrEngine + ?Sized,
{
    let total_pages = source.page_count();
    if let Some(page) = config.pages.first_out_of_range(total_pages) {
        return Err(ExtractError::PageOutOfRange {
            page,
            total: total_pages,
        });
    }

    let indices = config.pages.to_indices(total_pages);
    let selected = indices.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(selected);
    }

    let mut acquisition = Acquisition {
        pages: Vec::with_capacity(selected),
        raw_text: String::new(),
    };

    for &index in &indices {
        let page_num = index + 1;
        info!("Processing page {}/{}", page_num, total_pages);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, selected);
        }

        let page = acquire_page(source, ocr, index, config)?;

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, selected, page.source, page.text.chars().count());
        }

        acquisition.raw_text.push_str(&page.text);
        acquisition.raw_text.push_str(PAGE_SEPARATOR);
        acquisition.pages.push(page);
    }

    Ok(acquisition)
}

/// Acquire the text of the page at 0-based `index`.
pub fn acquire_page<S, O>(
    source: &S,
    ocr: &O,
    index: usize,
    config: &ExtractionConfig,
) -> Result<PageText, ExtractError>
where
    S: PageSource + ?Sized,
    O: OcrEngine + ?Sized,
{
    let start = Instant::now();
    let page_num = index + 1;

    let embedded = match config.ocr_policy {
        OcrPolicy::Always => String::new(),
        _ => source.embedded_text(index)?,
    };

    let (source_kind, text) = if needs_ocr(&embedded, config) {
        debug!(
            "Page {}: {} embedded chars, running OCR",
            page_num,
            embedded.trim().chars().count()
        );
        (TextSource::Ocr, ocr_page(source, ocr, index, config)?)
    } else {
        (TextSource::Embedded, embedded)
    };

    Ok(PageText {
        page_num,
        source: source_kind,
        text,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Render a page to a temporary PNG and OCR it.
///
/// The PNG is removed before returning, whether recognition succeeded or
/// not. An OCR error takes precedence over a cleanup error.
fn ocr_page<S, O>(
    source: &S,
    ocr: &O,
    index: usize,
    config: &ExtractionConfig,
) -> Result<String, ExtractError>
where
    S: PageSource + ?Sized,
    O: OcrEngine + ?Sized,
{
    let page_num = index + 1;
    let image = source.render(index, config.dpi)?;

    let temp_err = |source: std::io::Error| ExtractError::TempFileFailed {
        page: page_num,
        source,
    };

    let mut temp = create_temp_image(page_num, config).map_err(temp_err)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|e| temp_err(std::io::Error::other(e)))?;
        writer.flush().map_err(temp_err)?;
    }
    debug!("Page {}: wrote {}", page_num, temp.path().display());

    let recognized = ocr.recognize(temp.path(), page_num, &config.ocr_options());
    let removed = temp.close();

    let text = recognized?;
    removed.map_err(temp_err)?;
    Ok(text)
}

fn create_temp_image(page_num: usize, config: &ExtractionConfig) -> std::io::Result<NamedTempFile> {
    let prefix = format!("pdf2txt-page-{page_num}-");
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".png");
    match config.temp_dir {
        Some(ref dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSelection;
    use image::{Rgba, RgbaImage};
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    struct StubPages {
        texts: Vec<String>,
        renders: RefCell<Vec<(usize, u32)>>,
    }

    impl StubPages {
        fn new(texts: &[&str]) -> Self {
            Self {
                texts: texts.iter().map(|t| t.to_string()).collect(),
                renders: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource for StubPages {
        fn page_count(&self) -> usize {
            self.texts.len()
        }

        fn embedded_text(&self, index: usize) -> Result<String, ExtractError> {
            Ok(self.texts[index].clone())
        }

        fn render(&self, index: usize, dpi: u32) -> Result<DynamicImage, ExtractError> {
            self.renders.borrow_mut().push((index, dpi));
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                4,
                4,
                Rgba([255, 255, 255, 255]),
            )))
        }
    }

    #[derive(Default)]
    struct StubOcr {
        reply: Option<String>,
        seen: Mutex<Vec<PathBuf>>,
    }

    impl OcrEngine for StubOcr {
        fn recognize(
            &self,
            image_path: &Path,
            page_num: usize,
            _options: &crate::pipeline::ocr::OcrOptions,
        ) -> Result<String, ExtractError> {
            assert!(image_path.exists(), "temp image must exist during OCR");
            self.seen.lock().unwrap().push(image_path.to_path_buf());
            match self.reply {
                Some(ref text) => Ok(text.clone()),
                None => Err(ExtractError::OcrFailed {
                    page: page_num,
                    code: 1,
                    stderr: "stub failure".into(),
                }),
            }
        }
    }

    fn ocr_replying(text: &str) -> StubOcr {
        StubOcr {
            reply: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn threshold_is_exclusive() {
        let config = ExtractionConfig::default();
        assert!(needs_ocr(&"ক".repeat(50), &config));
        assert!(needs_ocr(&format!("  {}  \n", "a".repeat(50)), &config));
        assert!(!needs_ocr(&"ক".repeat(51), &config));
    }

    #[test]
    fn long_text_layer_skips_render_and_ocr() {
        let text = "a".repeat(51);
        let pages = StubPages::new(&[&text]);
        let ocr = ocr_replying("unused");
        let acq = acquire_text(&pages, &ocr, &ExtractionConfig::default()).unwrap();

        assert_eq!(acq.pages[0].source, TextSource::Embedded);
        assert_eq!(acq.pages[0].text, text);
        assert!(pages.renders.borrow().is_empty());
        assert!(ocr.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn short_text_layer_renders_at_dpi_and_ocrs() {
        let pages = StubPages::new(&[&"a".repeat(50)]);
        let ocr = ocr_replying("স্ক্যান");
        let acq = acquire_text(&pages, &ocr, &ExtractionConfig::default()).unwrap();

        assert_eq!(acq.pages[0].source, TextSource::Ocr);
        assert_eq!(acq.pages[0].text, "স্ক্যান");
        assert_eq!(*pages.renders.borrow(), vec![(0, 300)]);
        assert_eq!(ocr.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn raw_text_keeps_page_order_with_separators() {
        let long = "x".repeat(60);
        let pages = StubPages::new(&[&long, "", &long]);
        let ocr = ocr_replying("ocr");
        let acq = acquire_text(&pages, &ocr, &ExtractionConfig::default()).unwrap();
        assert_eq!(acq.raw_text, format!("{long}\n\nocr\n\n{long}\n\n"));
    }

    #[test]
    fn temp_image_removed_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExtractionConfig::builder().temp_dir(dir.path()).build().unwrap();
        let pages = StubPages::new(&["", ""]);
        let ocr = ocr_replying("text");
        acquire_text(&pages, &ocr, &config).unwrap();

        let seen = ocr.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|p| p.starts_with(dir.path()) && !p.exists()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn temp_image_removed_after_ocr_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExtractionConfig::builder().temp_dir(dir.path()).build().unwrap();
        let pages = StubPages::new(&[""]);
        let ocr = StubOcr::default();

        let err = acquire_text(&pages, &ocr, &config).unwrap_err();
        assert!(matches!(err, ExtractError::OcrFailed { page: 1, .. }));
        let seen = ocr.seen.lock().unwrap();
        assert!(!seen[0].exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn ocr_failure_aborts_remaining_pages() {
        let pages = StubPages::new(&["", ""]);
        let ocr = StubOcr::default();
        assert!(acquire_text(&pages, &ocr, &ExtractionConfig::default()).is_err());
        assert_eq!(ocr.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn policy_always_ignores_text_layer() {
        let pages = StubPages::new(&[&"a".repeat(200)]);
        let ocr = ocr_replying("ocr");
        let config = ExtractionConfig::builder()
            .ocr_policy(OcrPolicy::Always)
            .build()
            .unwrap();
        let acq = acquire_text(&pages, &ocr, &config).unwrap();
        assert_eq!(acq.pages[0].source, TextSource::Ocr);
        assert_eq!(acq.pages[0].text, "ocr");
    }

    #[test]
    fn policy_never_keeps_short_text_layer() {
        let pages = StubPages::new(&["short"]);
        let ocr = ocr_replying("unused");
        let config = ExtractionConfig::builder()
            .ocr_policy(OcrPolicy::Never)
            .build()
            .unwrap();
        let acq = acquire_text(&pages, &ocr, &config).unwrap();
        assert_eq!(acq.pages[0].source, TextSource::Embedded);
        assert!(pages.renders.borrow().is_empty());
    }

    #[test]
    fn page_selection_limits_pages() {
        let long = "y".repeat(60);
        let pages = StubPages::new(&[&long, &long, &long]);
        let ocr = ocr_replying("unused");
        let config = ExtractionConfig::builder()
            .pages(PageSelection::Set(vec![3, 1]))
            .build()
            .unwrap();
        let acq = acquire_text(&pages, &ocr, &config).unwrap();
        let nums: Vec<usize> = acq.pages.iter().map(|p| p.page_num).collect();
        assert_eq!(nums, vec![1, 3]);
    }

    #[test]
    fn out_of_range_selection_is_an_error() {
        let pages = StubPages::new(&["a"]);
        let ocr = ocr_replying("unused");
        let config = ExtractionConfig::builder()
            .pages(PageSelection::Single(2))
            .build()
            .unwrap();
        let err = acquire_text(&pages, &ocr, &config).unwrap_err();
        assert!(matches!(err, ExtractError::PageOutOfRange { page: 2, total: 1 }));
    }

    #[test]
    fn empty_document_yields_empty_text() {
        let pages = StubPages::new(&[]);
        let ocr = ocr_replying("unused");
        let acq = acquire_text(&pages, &ocr, &ExtractionConfig::default()).unwrap();
        assert!(acq.pages.is_empty());
        assert!(acq.raw_text.is_empty());
    }
}
