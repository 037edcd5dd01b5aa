//! Error types for the images2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Images2PdfError`] — **Fatal**: the conversion cannot proceed at all
//!   (missing folder, cancelled large batch, document could not be written).
//!   Returned as `Err(Images2PdfError)` from the top-level `convert*`
//!   functions.
//!
//! * [`ImageError`] — **Non-fatal**: a single image failed (unreadable bytes,
//!   degenerate dimensions, over the size policy) but the rest of the batch
//!   is fine. Stored inside [`crate::output::ItemRecord`] so callers can
//!   inspect partial success rather than losing the whole document to one
//!   bad file.
//!
//! The separation lets callers decide their own tolerance: abort on the
//! first failed image, log and continue, or collect all errors for a
//! post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the images2pdf library.
///
/// Per-image failures use [`ImageError`] and are stored in
/// [`crate::output::ItemRecord`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Images2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The source folder does not exist or is not a directory.
    #[error("folder not found: '{path}'\nCheck the path exists and is a directory.")]
    FolderNotFound { path: PathBuf },

    /// The folder exists but contains no file with a supported extension.
    #[error("no supported image files found in '{path}'\nSupported formats: jpg, jpeg, png, gif, bmp, webp, svg")]
    NoSupportedImages { path: PathBuf },

    /// None of the requested remote paths could be fetched.
    #[error("no images could be loaded from the given paths")]
    NoImagesLoaded,

    /// The supplied selection contains no supported image after filtering.
    #[error("selection contains no supported image files")]
    EmptySelection,

    // ── Batch errors ──────────────────────────────────────────────────────
    /// The caller declined (or never answered) the large-batch confirmation.
    #[error("conversion of {total} images cancelled by user")]
    CancelledByUser { total: usize },

    /// Every image in the batch failed; an empty document is never produced.
    #[error("all {total} images failed to convert.\nFirst error: {first_error}")]
    NoImagesProcessed { total: usize, first_error: String },

    // ── Sink errors ───────────────────────────────────────────────────────
    /// The assembled document could not be serialised.
    #[error("failed to serialise PDF document: {0}")]
    DocumentError(String),

    /// Could not write or rename the output file.
    #[error("failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single image.
///
/// The batch continues past any of these; the failed item commits no page
/// and is reported through the progress channel with an error-tagged label.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ImageError {
    /// The bytes could not be decoded as an image.
    #[error("'{name}': cannot decode image: {detail}")]
    Decode { name: String, detail: String },

    /// Width or height of zero — nothing to lay out.
    #[error("'{name}': invalid dimensions {width}x{height}")]
    InvalidDimensions {
        name: String,
        width: u32,
        height: u32,
    },

    /// The source exceeds the configured maximum byte size.
    #[error("'{name}': {bytes} bytes exceeds the {limit} byte limit — skipped")]
    Oversize {
        name: String,
        bytes: u64,
        limit: u64,
    },

    /// The source bytes could not be read at all.
    #[error("'{name}': cannot read source: {detail}")]
    Read { name: String, detail: String },
}

impl ImageError {
    /// Display name of the image this error belongs to.
    pub fn name(&self) -> &str {
        match self {
            ImageError::Decode { name, .. }
            | ImageError::InvalidDimensions { name, .. }
            | ImageError::Oversize { name, .. }
            | ImageError::Read { name, .. } => name,
        }
    }
}
