//! Result types returned by the extraction entry points.

use serde::{Deserialize, Serialize};

/// Where a page's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    /// The PDF's embedded text layer.
    Embedded,
    /// Tesseract OCR over a rasterised rendering of the page.
    Ocr,
}

/// Which normalizer path produced the cleaned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerPath {
    /// A linguistic tokenizer split the text; carries its name.
    Tokenizer(String),
    /// The rule-based Bangla spacing heuristic.
    Rules,
}

/// Text acquired for one page, before normalisation.
#[derive(Debug, Clone)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    pub source: TextSource,
    pub text: String,
    pub duration_ms: u64,
}

impl PageText {
    /// The serialisable summary of this page.
    pub fn summary(&self) -> PageResult {
        PageResult {
            page_num: self.page_num,
            source: self.source,
            chars: self.text.chars().count(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Per-page record included in [`ExtractionOutput`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    pub source: TextSource,
    /// Character count of the raw page text.
    pub chars: usize,
    pub duration_ms: u64,
}

/// Document-level metadata read from the PDF info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Aggregate numbers for one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages selected and processed.
    pub processed_pages: usize,
    pub embedded_pages: usize,
    pub ocr_pages: usize,
    pub raw_chars: usize,
    pub cleaned_chars: usize,
    pub normalizer: NormalizerPath,
    pub acquisition_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything an extraction run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Normalised text, ready to be written out.
    pub text: String,
    /// Page texts concatenated in page order, each followed by a blank line.
    pub raw_text: String,
    pub pages: Vec<PageResult>,
    pub metadata: DocumentMetadata,
    pub stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_summary_counts_chars_not_bytes() {
        let page = PageText {
            page_num: 1,
            source: TextSource::Ocr,
            text: "এবংতুমি".to_string(),
            duration_ms: 3,
        };
        let summary = page.summary();
        assert_eq!(summary.chars, 7);
        assert_eq!(summary.source, TextSource::Ocr);
    }

    #[test]
    fn text_source_serialises_lowercase() {
        let json = serde_json::to_string(&TextSource::Embedded).unwrap();
        assert_eq!(json, "\"embedded\"");
        let json = serde_json::to_string(&NormalizerPath::Rules).unwrap();
        assert_eq!(json, "\"rules\"");
    }
}
