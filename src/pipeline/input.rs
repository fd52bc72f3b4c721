//! Input resolution: validate a user-supplied path before pdfium sees it.
//!
//! pdfium reports a missing file, a permission problem and a non-PDF all as
//! the same opaque load failure. Checking existence, readability and the
//! `%PDF` magic bytes up front turns those into distinct, actionable errors.

use crate::error::ExtractError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` names a readable file starting with `%PDF`.
pub fn resolve_input(path: impl AsRef<Path>) -> Result<PathBuf, ExtractError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
        return Err(ExtractError::FileNotFound { path });
    }

    let mut file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => return Err(ExtractError::FileNotFound { path }),
    };

    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
        return Err(ExtractError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
