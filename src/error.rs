//! Error types for the pdfbinder library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BinderError`] — **Fatal**: the run cannot proceed at all (the input
//!   root does not exist or is not a directory, the configuration is
//!   invalid). Returned as `Err(BinderError)` from [`crate::run`] before any
//!   directory is touched.
//!
//! * [`DirectoryError`] — **Non-fatal**: a single directory failed (corrupt
//!   image, unwritable output path, a subdirectory that vanished mid-walk)
//!   but every other directory is fine. Stored inside
//!   [`crate::output::DirectoryStatus::Failed`] so callers can inspect
//!   partial success rather than losing the whole run to one bad folder.
//!
//! The separation lets callers decide their own tolerance: abort on the
//! first directory failure, log and continue, or collect all failures for a
//! post-run report. The library itself always continues.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfbinder library.
///
/// Directory-level failures use [`DirectoryError`] and are stored in
/// [`crate::output::DirectoryResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BinderError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input root was not found at the given path.
    #[error("Input directory not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// The input root exists but is a regular file (or other non-directory).
    #[error("Input path is not a directory: '{path}'")]
    InputNotADirectory { path: PathBuf },

    /// Process does not have permission to read the input root.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error scoped to a single candidate directory.
///
/// Stored in [`crate::output::DirectoryStatus::Failed`]. The overall run
/// continues past any number of these.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DirectoryError {
    /// The directory could not be listed (permission denied, removed
    /// mid-walk).
    #[error("Cannot list directory '{path}': {detail}")]
    Access { path: PathBuf, detail: String },

    /// A candidate image failed to decode; the whole document for this
    /// directory is abandoned.
    #[error("Cannot decode image '{path}': {detail}")]
    ImageDecode { path: PathBuf, detail: String },

    /// The output PDF could not be serialised or written.
    #[error("Cannot write document '{path}': {detail}")]
    DocumentWrite { path: PathBuf, detail: String },
}

impl DirectoryError {
    /// Short machine-friendly tag for log lines and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            DirectoryError::Access { .. } => "access",
            DirectoryError::ImageDecode { .. } => "decode",
            DirectoryError::DocumentWrite { .. } => "write",
        }
    }
}
