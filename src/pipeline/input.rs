//! Input resolution: turn a user-supplied path into something the core can
//! read.
//!
//! Text files are decoded lossily: invalid UTF-8 becomes U+FFFD instead of
//! failing the whole analysis. PDFs are recognised by extension and then
//! checked for the `%PDF` magic before pdfium sees them, so a mislabelled
//! file produces [`SkimError::NotAPdf`] rather than a pdfium parse error.

use crate::error::SkimError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// True when the path has a `.pdf` extension (any case).
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Map an I/O error on `path` into the unreadable-input family.
fn io_error(path: &Path, e: std::io::Error) -> SkimError {
    match e.kind() {
        std::io::ErrorKind::NotFound => SkimError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => SkimError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => SkimError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

/// Read a text document, replacing invalid UTF-8 sequences.
pub async fn read_text(path: &Path) -> Result<String, SkimError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(text)
}

/// Validate a local PDF path: it must exist, be readable, and start with
/// the `%PDF` magic bytes.
pub fn resolve_pdf(path: &Path) -> Result<PathBuf, SkimError> {
    if !path.exists() {
        return Err(SkimError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut f = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    let mut magic = [0u8; 4];
    if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
        return Err(SkimError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path.to_path_buf())
}
