//! Extraction entry points.
//!
//! The whole run is blocking: pdfium is bound, pages are walked in order,
//! and the concatenated text is normalised. The async functions move that
//! work onto `spawn_blocking` so callers inside a Tokio runtime don't stall
//! a worker thread; [`extract_sync`] is for callers without a runtime.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{DocumentMetadata, ExtractionOutput, ExtractionStats, TextSource};
use crate::pipeline::acquire::{self, PageSource};
use crate::pipeline::ocr::{OcrEngine, TesseractEngine};
use crate::pipeline::{input, normalize, render};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Extract and normalise the text of a PDF file.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Any failure is fatal: missing or invalid input, pdfium binding or load
/// errors, rasterisation errors and OCR errors all abort the run.
pub async fn extract(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let path = input_path.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || extract_blocking(&path, &config))
        .await
        .map_err(|e| ExtractError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Synchronous wrapper around [`extract`].
///
/// Runs the pipeline on the calling thread; no runtime is created.
pub fn extract_sync(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    extract_blocking(input_path.as_ref(), config)
}

/// Extract a PDF and write the cleaned text to `output_path`.
///
/// The file is written once, after every page succeeded. Uses an atomic
/// write (temp file + rename), so on error an existing file at
/// `output_path` is left untouched.
pub async fn extract_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let output = extract(input_path, config).await?;
    write_atomic(output_path.as_ref(), &output.text).await?;
    Ok(output)
}

/// Read PDF metadata without extracting any text.
///
/// Does not require Tesseract.
pub async fn inspect(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<DocumentMetadata, ExtractError> {
    let path = input::resolve_input(input_path)?;
    let lib_path = config.pdfium_lib_path.clone();
    let password = config.password.clone();

    tokio::task::spawn_blocking(move || {
        let pdfium = render::bind_pdfium(lib_path.as_deref())?;
        let document = render::open_document(&pdfium, &path, password.as_deref())?;
        let metadata = render::PdfiumDocument::new(document).metadata();
        Ok(metadata)
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("Metadata task panicked: {}", e)))?
}

/// Run acquisition and normalisation over any [`PageSource`] / [`OcrEngine`] pair.
///
/// [`extract`] calls this with pdfium and Tesseract; it is public so the
/// pipeline can be driven with other collaborators.
pub fn extract_from_source<S, O>(
    source: &S,
    ocr: &O,
    metadata: DocumentMetadata,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError>
where
    S: PageSource + ?Sized,
    O: OcrEngine + ?Sized,
{
    let total_start = Instant::now();

    let acquisition = acquire::acquire_text(source, ocr, config)?;
    let acquisition_duration_ms = total_start.elapsed().as_millis() as u64;

    let normalized = normalize::normalize(&acquisition.raw_text, config.tokenizer.as_deref());

    let pages: Vec<_> = acquisition.pages.iter().map(|p| p.summary()).collect();
    let ocr_pages = pages.iter().filter(|p| p.source == TextSource::Ocr).count();

    let stats = ExtractionStats {
        total_pages: source.page_count(),
        processed_pages: pages.len(),
        embedded_pages: pages.len() - ocr_pages,
        ocr_pages,
        raw_chars: acquisition.raw_text.chars().count(),
        cleaned_chars: normalized.text.chars().count(),
        normalizer: normalized.path,
        acquisition_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} pages ({} OCR), {} chars, {}ms",
        stats.processed_pages, stats.ocr_pages, stats.cleaned_chars, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(stats.processed_pages);
    }

    Ok(ExtractionOutput {
        text: normalized.text,
        raw_text: acquisition.raw_text,
        pages,
        metadata,
        stats,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn extract_blocking(
    input_path: &Path,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let path = input::resolve_input(input_path)?;
    info!("Starting extraction: {}", path.display());

    let pdfium = render::bind_pdfium(config.pdfium_lib_path.as_deref())?;
    let document = render::open_document(&pdfium, &path, config.password.as_deref())?;
    let document = render::PdfiumDocument::new(document);
    let metadata = document.metadata();

    let ocr = TesseractEngine::new(config.resolved_ocr_binary());
    extract_from_source(&document, &ocr, metadata, config)
}

async fn write_atomic(path: &Path, contents: &str) -> Result<(), ExtractError> {
    let write_err = |source: std::io::Error| ExtractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = tmp_path_for(path);
    tokio::fs::write(&tmp_path, contents).await.map_err(write_err)?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
