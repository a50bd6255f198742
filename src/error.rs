//! Error types for the docskim library.
//!
//! A single fatal error type, [`SkimError`], covers every fallible entry
//! point. The variants fall into four families:
//!
//! * **Unreadable input**: the file is missing, unreadable, or not the kind
//!   of document the caller asked for. Raised by the collaborators in
//!   [`crate::pipeline`] before the core ever sees any text.
//! * **Core contract violations**: a negative extent, an unknown format
//!   hint, or a nonsensical configuration value. These are rejected rather
//!   than silently clamped.
//! * **PDF / fetch failures**: pdfium or the network could not deliver the
//!   document.
//! * **Internal**: a background task panicked or a temp resource failed.
//!
//! Degenerate documents (zero lines, fewer lines than chunks) are *not*
//! errors; the sampling planner handles them as ordinary edge cases.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docskim library.
#[derive(Debug, Error)]
pub enum SkimError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the file failed for another reason.
    #[error("Error reading file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Core contract errors ──────────────────────────────────────────────
    /// A document extent cannot be negative.
    #[error("Invalid extent: total must be non-negative, got {total}")]
    InvalidExtent { total: i64 },

    /// An explicit format hint outside the recognised set.
    #[error(
        "Unsupported format hint '{hint}'\n\
Expected one of: auto, markdown, structured_markup, numbered_book, plain"
    )]
    UnsupportedFormatHint { hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium for your platform, or set PDFIUM_LIB_PATH=/path/to/libpdfium\n\
(a file, or the directory containing it).\n"
    )]
    PdfiumBindingFailed(String),

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The input string is not a valid HTTP/HTTPS URL.
    #[error("Invalid URL '{input}': expected an http:// or https:// address")]
    InvalidUrl { input: String },

    /// HTTP request failed (connection, TLS, or non-success status).
    #[error("Failed to fetch '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {secs}s for '{url}'")]
    FetchTimeout { url: String, secs: u64 },

    /// The curl fallback could not run or exited unsuccessfully.
    #[error("curl fallback failed for '{url}': {reason}")]
    CurlFailed { url: String, reason: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SkimError {
    /// True for the "could not read the document at all" family.
    pub fn is_unreadable_input(&self) -> bool {
        matches!(
            self,
            SkimError::FileNotFound { .. }
                | SkimError::PermissionDenied { .. }
                | SkimError::ReadFailed { .. }
                | SkimError::NotAPdf { .. }
                | SkimError::CorruptPdf { .. }
        )
    }
}
