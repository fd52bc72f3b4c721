//! Pipeline stages for PDF text extraction.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and the external engines (pdfium, Tesseract) stay behind traits.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ acquire ──▶ ocr ──▶ normalize
//! (path)    (pdfium)   (per page)  (tess)  (spacing)
//! ```
//!
//! 1. [`input`]     — validate the user-supplied path and `%PDF` magic
//! 2. [`render`]    — bind pdfium, read text layers, rasterise pages
//! 3. [`acquire`]   — choose embedded text or OCR per page; build RawText
//! 4. [`ocr`]       — run Tesseract on a temporary page image
//! 5. [`normalize`] — whitespace collapse, tokenizer or rule-based spacing

pub mod acquire;
pub mod input;
pub mod normalize;
pub mod ocr;
pub mod render;
