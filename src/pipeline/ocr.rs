//! OCR: recognise text in a rasterised page image with Tesseract.
//!
//! The engine is driven through its command-line binary rather than
//! linked, so the only runtime requirement is a `tesseract` executable with
//! the `ben` and `eng` traineddata installed. The binary location is
//! resolved once from [`crate::ExtractionConfig`]; see [`default_binary`]
//! for the per-platform fallback.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Default Tesseract install location on Windows.
pub const WINDOWS_TESSERACT_PATH: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";

/// Recognises text in an image file.
pub trait OcrEngine: Send + Sync {
    /// Return the text recognised in `image_path`.
    ///
    /// `page_num` (1-indexed) is only used for error reporting.
    fn recognize(
        &self,
        image_path: &Path,
        page_num: usize,
        options: &OcrOptions,
    ) -> Result<String, ExtractError>;
}

/// Language and mode settings passed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrOptions {
    /// Tesseract language string, e.g. `ben+eng`.
    pub languages: String,
    /// `--oem`: 3 lets Tesseract pick the best available engine.
    pub engine_mode: u8,
    /// `--psm`: 6 treats the page as one uniform block of text.
    pub page_segmentation_mode: u8,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            languages: "ben+eng".to_string(),
            engine_mode: 3,
            page_segmentation_mode: 6,
        }
    }
}

impl OcrOptions {
    /// Command-line arguments that follow `<image> stdout`.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--oem".to_string(),
            self.engine_mode.to_string(),
            "--psm".to_string(),
            self.page_segmentation_mode.to_string(),
            "-l".to_string(),
            self.languages.clone(),
        ]
    }
}

/// Tesseract invoked as an external process.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// `true` when `<binary> --version` runs and exits successfully.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(
        &self,
        image_path: &Path,
        page_num: usize,
        options: &OcrOptions,
    ) -> Result<String, ExtractError> {
        let args = options.to_args();
        debug!(
            "Page {}: {} {} stdout {}",
            page_num,
            self.binary.display(),
            image_path.display(),
            args.join(" ")
        );

        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .args(&args)
            .output()
            .map_err(|e| ExtractError::OcrUnavailable {
                binary: self.binary.clone(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ExtractError::OcrFailed {
                page: page_num,
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Per-platform default for the Tesseract binary.
///
/// On Windows the standard installer location is used when it exists;
/// everywhere else (and as a Windows fallback) `tesseract` is looked up on
/// `PATH`.
pub fn default_binary() -> PathBuf {
    if cfg!(windows) {
        let installed = PathBuf::from(WINDOWS_TESSERACT_PATH);
        if installed.exists() {
            return installed;
        }
    }
    PathBuf::from("tesseract")
}
