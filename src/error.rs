//! Error types for the pdf2tiff library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2TiffError`] — **Fatal**: the run cannot produce an artifact at
//!   all (no inputs, every source failed, the TIFF could not be written,
//!   or — under [`crate::config::FailurePolicy::FailFast`] — any single
//!   source failed). Returned as `Err(Pdf2TiffError)` from the top-level
//!   `combine*` functions.
//!
//! * [`SourceError`] — **Non-fatal**: one input file failed (unreadable,
//!   not a PDF, rasterisation glitch) but the batch continues. Stored
//!   inside [`crate::output::SourceResult`] under
//!   [`crate::config::FailurePolicy::SkipFailed`] so callers can inspect
//!   partial success rather than losing the whole batch to one bad file.
//!
//! The separation lets callers pick their own tolerance per call: abort on
//! the first bad file for interactive use, or skip and report for batch use.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2tiff library.
///
/// Per-file failures under the skip policy use [`SourceError`] and are
/// stored in [`crate::output::SourceResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Pdf2TiffError {
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

    /// A directory scan was requested on something that is not a directory.
    #[error("Not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// The input list was empty.
    #[error("No PDF files provided")]
    NoSourcesProvided,

    /// A directory scan found no PDF files.
    #[error("No PDF files found in '{dir}'")]
    NoSourcesFound { dir: PathBuf },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// A source file failed and the failure policy is fail-fast.
    #[error("Error processing '{path}': {detail}")]
    SourceFailed { path: PathBuf, detail: String },

    /// Every source failed under the skip policy; the artifact would be empty.
    #[error("No pages were extracted from {sources} PDF file(s)")]
    NoPagesExtracted { sources: usize },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The TIFF encoder rejected the accumulated frames.
    #[error("Error creating TIFF file '{path}': {detail}")]
    EncodeFailed { path: PathBuf, detail: String },

    /// Could not create, write, or move the output file into place.
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
Install pdfium or point PDFIUM_LIB_PATH at a directory containing\n\
libpdfium for your platform (see https://github.com/bblanchon/pdfium-binaries)."
    )]
    EngineUnavailable(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input file.
///
/// Recorded in [`crate::output::SourceResult`] when a file fails under
/// [`crate::config::FailurePolicy::SkipFailed`]. The overall run continues
/// unless ALL files fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum SourceError {
    /// The file could not be read or is not a PDF.
    #[error("'{path}': unreadable input: {detail}")]
    Unreadable { path: PathBuf, detail: String },

    /// pdfium failed to open or rasterise the file.
    #[error("'{path}': rasterisation failed: {detail}")]
    RenderFailed { path: PathBuf, detail: String },
}

impl SourceError {
    /// Path of the file this error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            SourceError::Unreadable { path, .. } => path,
            SourceError::RenderFailed { path, .. } => path,
        }
    }

    /// Human-readable detail without the path prefix.
    pub fn detail(&self) -> &str {
        match self {
            SourceError::Unreadable { detail, .. } => detail,
            SourceError::RenderFailed { detail, .. } => detail,
        }
    }
}
