//! Configuration types for PDF text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Every knob is resolved once, before
//! the first page is touched; nothing in the pipeline consults global or
//! platform state on its own.

use crate::error::ExtractError;
use crate::pipeline::normalize::WordTokenizer;
use crate::pipeline::ocr::{self, OcrOptions};
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Lowest accepted rasterisation DPI.
pub const MIN_DPI: u32 = 72;
/// Highest accepted rasterisation DPI.
pub const MAX_DPI: u32 = 600;

/// Configuration for a single PDF text extraction.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use bangla_pdf2txt::{ExtractionConfig, OcrPolicy};
///
/// let config = ExtractionConfig::builder()
///     .dpi(300)
///     .min_text_chars(80)
///     .ocr_policy(OcrPolicy::Auto)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Rasterisation DPI for pages sent to OCR. Range: 72–600. Default: 300.
    ///
    /// Tesseract's Bengali model is trained on ~300 DPI scans; conjunct
    /// glyphs lose their hasanta and matra strokes well before 150 DPI.
    pub dpi: u32,

    /// Embedded-text threshold in characters. Default: 50.
    ///
    /// A page whose trimmed embedded text is longer than this is taken
    /// verbatim. At or below it the page is treated as scanned and OCR'd.
    pub min_text_chars: usize,

    /// When to run OCR. Default: [`OcrPolicy::Auto`].
    pub ocr_policy: OcrPolicy,

    /// Override path to the Tesseract binary.
    /// If None, a per-platform default is used (see [`ocr::default_binary`]).
    pub ocr_binary_path: Option<PathBuf>,

    /// Tesseract language string. Default: `ben+eng`.
    pub ocr_languages: String,

    /// Tesseract `--oem` value. Default: 3 (default engine, LSTM if available).
    pub ocr_engine_mode: u8,

    /// Tesseract `--psm` value. Default: 6 (single uniform block of text).
    pub ocr_page_segmentation_mode: u8,

    /// Optional linguistic tokenizer. If None, the rule-based normalizer runs.
    pub tokenizer: Option<Arc<dyn WordTokenizer>>,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Directory containing the pdfium shared library.
    /// If None, `PDFIUM_LIB_PATH`, the working directory and the system
    /// library are tried in that order.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Directory for temporary page images. If None, the system temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            min_text_chars: 50,
            ocr_policy: OcrPolicy::default(),
            ocr_binary_path: None,
            ocr_languages: "ben+eng".to_string(),
            ocr_engine_mode: 3,
            ocr_page_segmentation_mode: 6,
            tokenizer: None,
            pages: PageSelection::default(),
            password: None,
            pdfium_lib_path: None,
            temp_dir: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("dpi", &self.dpi)
            .field("min_text_chars", &self.min_text_chars)
            .field("ocr_policy", &self.ocr_policy)
            .field("ocr_binary_path", &self.ocr_binary_path)
            .field("ocr_languages", &self.ocr_languages)
            .field("ocr_engine_mode", &self.ocr_engine_mode)
            .field("ocr_page_segmentation_mode", &self.ocr_page_segmentation_mode)
            .field("tokenizer", &self.tokenizer.as_ref().map(|t| t.name().to_string()))
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("temp_dir", &self.temp_dir)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Tesseract options derived from this config.
    pub fn ocr_options(&self) -> OcrOptions {
        OcrOptions {
            languages: self.ocr_languages.clone(),
            engine_mode: self.ocr_engine_mode,
            page_segmentation_mode: self.ocr_page_segmentation_mode,
        }
    }

    /// The OCR binary to invoke: the configured override, else the platform default.
    pub fn resolved_ocr_binary(&self) -> PathBuf {
        self.ocr_binary_path
            .clone()
            .unwrap_or_else(ocr::default_binary)
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl fmt::Debug for ExtractionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ExtractionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn min_text_chars(mut self, n: usize) -> Self {
        self.config.min_text_chars = n;
        self
    }

    pub fn ocr_policy(mut self, policy: OcrPolicy) -> Self {
        self.config.ocr_policy = policy;
        self
    }

    pub fn ocr_binary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ocr_binary_path = Some(path.into());
        self
    }

    pub fn ocr_languages(mut self, langs: impl Into<String>) -> Self {
        self.config.ocr_languages = langs.into();
        self
    }

    pub fn ocr_engine_mode(mut self, oem: u8) -> Self {
        self.config.ocr_engine_mode = oem;
        self
    }

    pub fn ocr_page_segmentation_mode(mut self, psm: u8) -> Self {
        self.config.ocr_page_segmentation_mode = psm;
        self
    }

    pub fn tokenizer(mut self, tokenizer: Arc<dyn WordTokenizer>) -> Self {
        self.config.tokenizer = Some(tokenizer);
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn temp_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.dpi < MIN_DPI || c.dpi > MAX_DPI {
            return Err(ExtractError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.ocr_languages.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "OCR language string must not be empty".into(),
            ));
        }
        if c.ocr_engine_mode > 3 {
            return Err(ExtractError::InvalidConfig(format!(
                "OCR engine mode must be 0–3, got {}",
                c.ocr_engine_mode
            )));
        }
        if c.ocr_page_segmentation_mode > 13 {
            return Err(ExtractError::InvalidConfig(format!(
                "OCR page segmentation mode must be 0–13, got {}",
                c.ocr_page_segmentation_mode
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// When the acquisition stage falls back to OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OcrPolicy {
    /// OCR only pages whose embedded text is at or below `min_text_chars`. (default)
    #[default]
    Auto,
    /// OCR every page, ignoring the embedded text layer.
    Always,
    /// Never OCR; short or empty text layers are used as-is.
    Never,
}

/// Specifies which pages of the PDF to process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Process all pages (default).
    #[default]
    All,
    /// Process a single page (1-indexed).
    Single(usize),
    /// Process a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Process specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// First requested page (1-indexed) that lies beyond `total_pages`, if any.
    pub fn first_out_of_range(&self, total_pages: usize) -> Option<usize> {
        match self {
            PageSelection::All => None,
            PageSelection::Single(p) => (*p == 0 || *p > total_pages).then_some(*p),
            PageSelection::Range(start, end) => {
                if *start == 0 || *start > total_pages {
                    Some(*start)
                } else if *end > total_pages {
                    Some(*end)
                } else {
                    None
                }
            }
            PageSelection::Set(pages) => pages
                .iter()
                .copied()
                .find(|&p| p == 0 || p > total_pages),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let c = ExtractionConfig::default();
        assert_eq!(c.dpi, 300);
        assert_eq!(c.min_text_chars, 50);
        assert_eq!(c.ocr_policy, OcrPolicy::Auto);
        let opts = c.ocr_options();
        assert_eq!(opts.languages, "ben+eng");
        assert_eq!(opts.engine_mode, 3);
        assert_eq!(opts.page_segmentation_mode, 6);
        assert!(c.tokenizer.is_none());
    }

    #[test]
    fn build_rejects_out_of_range_dpi() {
        assert!(ExtractionConfig::builder().dpi(50).build().is_err());
        assert!(ExtractionConfig::builder().dpi(1200).build().is_err());
        assert!(ExtractionConfig::builder().dpi(600).build().is_ok());
    }

    #[test]
    fn build_rejects_bad_tesseract_modes() {
        assert!(ExtractionConfig::builder().ocr_engine_mode(4).build().is_err());
        assert!(ExtractionConfig::builder()
            .ocr_page_segmentation_mode(14)
            .build()
            .is_err());
        assert!(ExtractionConfig::builder().ocr_languages("  ").build().is_err());
    }

    #[test]
    fn ocr_binary_override_wins() {
        let c = ExtractionConfig::builder()
            .ocr_binary_path("/usr/local/bin/tesseract")
            .build()
            .unwrap();
        assert_eq!(
            c.resolved_ocr_binary(),
            PathBuf::from("/usr/local/bin/tesseract")
        );
    }

    #[test]
    fn debug_redacts_password() {
        let c = ExtractionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2]
        );
    }

    #[test]
    fn page_selection_out_of_range() {
        assert_eq!(PageSelection::All.first_out_of_range(0), None);
        assert_eq!(PageSelection::Single(6).first_out_of_range(5), Some(6));
        assert_eq!(PageSelection::Range(2, 9).first_out_of_range(5), Some(9));
        assert_eq!(PageSelection::Set(vec![1, 0]).first_out_of_range(5), Some(0));
        assert_eq!(PageSelection::Set(vec![1, 5]).first_out_of_range(5), None);
    }
}
