//! Error types for the pdftomarkd library.
//!
//! Every failure a single-file conversion can hit is one variant of
//! [`ConvertError`]. Variants fall into four broad kinds, exposed through
//! [`ConvertError::kind`], so callers can branch on the category without
//! matching message text:
//!
//! * [`FailureKind::Input`] — the input was rejected before the engine ran
//!   (missing file, wrong extension, invalid watch folder, bad settings).
//! * [`FailureKind::Open`] — the PDF engine could not open the document.
//! * [`FailureKind::Extract`] — the document opened but a page failed.
//! * [`FailureKind::Write`] — the Markdown or an image file could not be
//!   written.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdftomarkd library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Input path does not carry a `.pdf` extension.
    #[error("Not a PDF file: '{path}'")]
    NotAPdf { path: PathBuf },

    /// Watch target is missing or is not a directory.
    #[error("Invalid folder: '{path}'")]
    InvalidFolder { path: PathBuf },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// The PDF engine refused to open the document (corrupt, encrypted, …).
    #[error("Failed to open PDF '{path}': {detail}")]
    Open { path: PathBuf, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or place the library next to the binary."
    )]
    EngineUnavailable(String),

    /// A page could not be read after the document opened.
    #[error("Failed to extract page {page} of '{path}': {detail}")]
    Extract {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file or directory.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. the blocking extraction task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse category of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rejected before conversion started.
    Input,
    /// The document could not be opened.
    Open,
    /// The document opened but its content could not be extracted.
    Extract,
    /// Output could not be written.
    Write,
}

impl ConvertError {
    /// The category this error belongs to.
    pub fn kind(&self) -> FailureKind {
        match self {
            ConvertError::FileNotFound { .. }
            | ConvertError::NotAPdf { .. }
            | ConvertError::InvalidFolder { .. }
            | ConvertError::InvalidConfig(_) => FailureKind::Input,
            ConvertError::Open { .. } | ConvertError::EngineUnavailable(_) => FailureKind::Open,
            ConvertError::Extract { .. } | ConvertError::Internal(_) => FailureKind::Extract,
            ConvertError::Write { .. } => FailureKind::Write,
        }
    }

    /// Wrap an I/O error raised while writing `path`.
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Write {
            path: path.into(),
            source,
        }
    }
}
