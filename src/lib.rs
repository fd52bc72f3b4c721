//! # bangla-pdf2txt
//!
//! Extract Bangla (and mixed Bangla/English) text from PDF documents.
//!
//! Each page's embedded text layer is used when it carries real content.
//! Scanned pages, whose text layer is empty or nearly so, are rasterised at
//! 300 DPI and read by Tesseract with the `ben+eng` models. The combined text
//! is then normalised to repair the spacing damage that Bangla script takes
//! from both extraction paths.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate path and %PDF magic bytes
//!  ├─ 2. Render     bind pdfium, open document (spawn_blocking)
//!  ├─ 3. Acquire    per page: text layer > 50 chars, else render + OCR
//!  ├─ 4. Normalize  collapse whitespace; tokenizer or Bangla spacing rules
//!  └─ 5. Output     cleaned text + per-page stats, optional atomic file write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bangla_pdf2txt::{extract_to_file, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract_to_file("bangla.pdf", "bangla_text_cleaned.txt", &config).await?;
//!     eprintln!("{} pages, {} via OCR", output.stats.processed_pages, output.stats.ocr_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2txt` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Runtime requirements
//!
//! * a pdfium shared library (see [`pipeline::render::bind_pdfium`])
//! * `tesseract` with the `ben` and `eng` traineddata, for scanned pages only

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, OcrPolicy, PageSelection};
pub use error::{ExtractError, TokenizeError};
pub use extract::{extract, extract_from_source, extract_sync, extract_to_file, inspect};
pub use output::{
    DocumentMetadata, ExtractionOutput, ExtractionStats, NormalizerPath, PageResult, PageText,
    TextSource,
};
pub use pipeline::acquire::PageSource;
pub use pipeline::normalize::{normalize, UnicodeWordTokenizer, WordTokenizer};
pub use pipeline::ocr::{OcrEngine, OcrOptions, TesseractEngine};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
