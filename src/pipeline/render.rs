//! pdfium access: bind the library, open documents, read text layers and
//! rasterise pages.
//!
//! ## Why bind per run?
//!
//! pdfium keeps thread-local state and must not be shared across the async
//! executor. The pipeline binds it inside the blocking task that walks the
//! pages, and the binding is dropped when that task ends.
//!
//! ## Why scale by DPI?
//!
//! PDF user space is 72 units per inch, so a DPI of `d` is a render scale of
//! `d / 72`. Tesseract's accuracy depends on glyph size in pixels, which is
//! exactly what DPI fixes regardless of the page's physical size.

use crate::error::ExtractError;
use crate::output::DocumentMetadata;
use crate::pipeline::acquire::PageSource;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a pdfium library file or its directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium shared library.
///
/// Tried in order: `lib_path` (file or directory), `$PDFIUM_LIB_PATH`, the
/// working directory, then the system library search path.
pub fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, ExtractError> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(p) = lib_path {
        candidates.push(p.to_path_buf());
    }
    if let Ok(p) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !p.is_empty() {
            candidates.push(PathBuf::from(p));
        }
    }
    candidates.push(PathBuf::from("./"));

    let mut last_err = String::from("no candidate paths");
    for candidate in candidates {
        let library = library_file(&candidate);
        match Pdfium::bind_to_library(&library) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", library.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => {
                debug!("pdfium not usable at {}: {:?}", library.display(), e);
                last_err = format!("{}: {:?}", library.display(), e);
            }
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{last_err}; system library: {e:?}")))
}

/// Platform library file for a candidate that may be a file or a directory.
fn library_file(candidate: &Path) -> PathBuf {
    if candidate.is_file() {
        candidate.to_path_buf()
    } else {
        Pdfium::pdfium_platform_library_name_at_path(candidate)
    }
}

/// Open a PDF, mapping pdfium's load errors onto [`ExtractError`].
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, ExtractError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                ExtractError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                ExtractError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            ExtractError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// pdfium addresses pages with a `u16`; anything wider is out of range.
fn page_index(index: usize, total: usize) -> Result<u16, ExtractError> {
    u16::try_from(index).map_err(|_| ExtractError::PageOutOfRange {
        page: index + 1,
        total,
    })
}

/// An open pdfium document exposed as a [`PageSource`].
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    pub fn new(document: PdfDocument<'a>) -> Self {
        let pages = document.pages().len();
        info!("PDF loaded: {} pages", pages);
        Self { document }
    }

    fn page(&self, index: usize) -> Result<Result<PdfPage<'_>, PdfiumError>, ExtractError> {
        let page_index = page_index(index, self.page_count())?;
        Ok(self.document.pages().get(page_index))
    }

    /// Document metadata from the PDF info dictionary.
    pub fn metadata(&self) -> DocumentMetadata {
        let metadata = self.document.metadata();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().trim().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        DocumentMetadata {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
            modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
            page_count: self.page_count(),
            pdf_version: format!("{:?}", self.document.version()),
        }
    }
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn embedded_text(&self, index: usize) -> Result<String, ExtractError> {
        let to_err = |e: PdfiumError| ExtractError::TextLayerFailed {
            page: index + 1,
            detail: format!("{:?}", e),
        };
        let page = self.page(index)?.map_err(to_err)?;
        let text = page.text().map_err(to_err)?;
        Ok(text.all())
    }

    fn render(&self, index: usize, dpi: u32) -> Result<DynamicImage, ExtractError> {
        let to_err = |e: PdfiumError| ExtractError::RasterisationFailed {
            page: index + 1,
            detail: format!("{:?}", e),
        };
        let page = self.page(index)?.map_err(to_err)?;
        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);
        let bitmap = page.render_with_config(&render_config).map_err(to_err)?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} at {} DPI → {}x{} px",
            index + 1,
            dpi,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}
