//! Error types for the bangla-pdf2txt library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the extraction cannot proceed (bad input
//!   file, pdfium missing, OCR engine failed on a page, output not
//!   writable). Returned as `Err(ExtractError)` from the top-level
//!   `extract*` functions. Nothing is written to the output path.
//!
//! * [`TokenizeError`] — **Recovered**: a linguistic tokenizer could not
//!   split the text. The normalizer logs it and falls back to the rule-based
//!   heuristic; callers never see it.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the bangla-pdf2txt library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium could not read the embedded text layer of a page.
    #[error("Reading the text layer of page {page} failed: {detail}")]
    TextLayerFailed { page: usize, detail: String },

    /// pdfium-render returned an error while rasterising a page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR binary could not be started at all.
    #[error(
        "Could not run the OCR engine '{binary}': {detail}\n\
Install Tesseract with the Bengali language pack (tesseract-ocr-ben),\n\
or point --tesseract / TESSERACT_PATH at an existing binary."
    )]
    OcrUnavailable { binary: PathBuf, detail: String },

    /// The OCR binary ran but exited unsuccessfully for a page.
    #[error("OCR failed for page {page} (exit code {code}): {stderr}")]
    OcrFailed {
        page: usize,
        code: i32,
        stderr: String,
    },

    /// The temporary page image could not be created, written or removed.
    #[error("Temporary image for page {page} failed: {source}")]
    TempFileFailed {
        page: usize,
        #[source]
        source: std::io::Error,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Download a build for your platform from bblanchon/pdfium-binaries and either\n\
  • place libpdfium next to the binary, or\n\
  • set PDFIUM_LIB_PATH=/path/to/dir-containing-libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A linguistic tokenizer could not split the text.
#[derive(Debug, Clone, Error)]
#[error("tokenizer '{tokenizer}' failed: {detail}")]
pub struct TokenizeError {
    pub tokenizer: String,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_out_of_range_display() {
        let e = ExtractError::PageOutOfRange { page: 7, total: 3 };
        let msg = e.to_string();
        assert!(msg.contains("Page 7"), "got: {msg}");
        assert!(msg.contains("3 pages"), "got: {msg}");
    }

    #[test]
    fn ocr_unavailable_mentions_binary() {
        let e = ExtractError::OcrUnavailable {
            binary: PathBuf::from("/opt/tess/tesseract"),
            detail: "No such file or directory".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("/opt/tess/tesseract"));
        assert!(msg.contains("TESSERACT_PATH"));
    }

    #[test]
    fn ocr_failed_display() {
        let e = ExtractError::OcrFailed {
            page: 2,
            code: 1,
            stderr: "Failed loading language 'ben'".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 2"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("'ben'"));
    }

    #[test]
    fn temp_file_failed_keeps_source() {
        use std::error::Error as _;
        let e = ExtractError::TempFileFailed {
            page: 4,
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.to_string().contains("disk full"));
        assert!(e.source().is_some());
    }

    #[test]
    fn tokenize_error_display() {
        let e = TokenizeError {
            tokenizer: "unicode".into(),
            detail: "empty".into(),
        };
        assert_eq!(e.to_string(), "tokenizer 'unicode' failed: empty");
    }
}
