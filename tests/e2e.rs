//! End-to-end tests against a real PDF, pdfium and Tesseract.
//!
//! Gated behind `E2E_ENABLED` so they do not run in CI unless explicitly
//! requested. `BANGLA_PDF` must point at a Bangla PDF; pdfium is found via
//! `PDFIUM_LIB_PATH` and Tesseract via `TESSERACT_PATH` or `PATH`.
//!
//! Run with:
//!   E2E_ENABLED=1 BANGLA_PDF=bangla.pdf PDFIUM_LIB_PATH=. cargo test --test e2e -- --nocapture

use bangla_pdf2txt::{
    extract, extract_to_file, inspect, ExtractionConfig, OcrPolicy, PageSelection, TextSource,
};
use std::path::PathBuf;

/// Skip this test unless E2E_ENABLED is set and BANGLA_PDF names a file.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p = match std::env::var("BANGLA_PDF") {
            Ok(p) => PathBuf::from(p),
            Err(_) => {
                println!("SKIP — set BANGLA_PDF=/path/to/file.pdf");
                return;
            }
        };
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

fn assert_clean_text(text: &str, context: &str) {
    assert!(!text.trim().is_empty(), "[{context}] text is empty");
    assert!(!text.contains("  "), "[{context}] double space survived");
    assert!(!text.contains('\n'), "[{context}] newline survived");
    assert_eq!(text, text.trim(), "[{context}] untrimmed output");
    println!("[{context}] ✓  {} chars", text.chars().count());
}

#[tokio::test]
async fn test_inspect() {
    let path = e2e_skip_unless_ready!();
    let meta = inspect(&path, &ExtractionConfig::default())
        .await
        .expect("inspect() should succeed");
    assert!(meta.page_count > 0);
    assert!(!meta.pdf_version.is_empty());
    println!("Metadata: {:?}", meta);
}

#[tokio::test]
async fn test_extract_first_page() {
    let path = e2e_skip_unless_ready!();
    let config = ExtractionConfig::builder()
        .pages(PageSelection::Single(1))
        .build()
        .unwrap();
    let output = extract(&path, &config).await.expect("extract() should succeed");

    assert_eq!(output.pages.len(), 1);
    assert_clean_text(&output.text, "first page");
}

#[tokio::test]
async fn test_forced_ocr_writes_file() {
    let path = e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("bangla_text_cleaned.txt");
    let config = ExtractionConfig::builder()
        .pages(PageSelection::Single(1))
        .ocr_policy(OcrPolicy::Always)
        .temp_dir(dir.path())
        .build()
        .unwrap();

    let output = extract_to_file(&path, &out_path, &config)
        .await
        .expect("extract_to_file() should succeed");

    assert_eq!(output.pages[0].source, TextSource::Ocr);
    let written = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(written, output.text);
    assert_clean_text(&written, "forced OCR");

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "png"))
        .collect();
    assert!(leftovers.is_empty(), "temporary page images left behind");
}
