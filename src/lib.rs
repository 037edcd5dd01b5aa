//! # images2pdf
//!
//! Convert a batch of images into a single multi-page PDF.
//!
//! ## Why this crate?
//!
//! Stapling a folder of scans, screenshots, or photos into one shareable
//! document is a chore that generic PDF tools make harder than it should
//! be. This crate does exactly that one thing: each image gets its own
//! page, scaled to fit and centered, captioned with its file name and a
//! page-number footer. Failures stay contained — one unreadable file never
//! costs you the other four hundred.
//!
//! ## Pipeline Overview
//!
//! ```text
//! images
//!  │
//!  ├─ 1. Select   filter by supported format, sort by name
//!  ├─ 2. Prepare  decode, downscale, re-encode at quality (spawn_blocking)
//!  ├─ 3. Layout   centered aspect-preserving fit inside the printable area
//!  ├─ 4. Compose  page ops: image XObject + caption + "N / total" footer
//!  └─ 5. Sink     serialise once, deliver (file write or custom sink)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use images2pdf::{convert_dir_to_pdf, PdfConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PdfConfig::default();
//!     let stats = convert_dir_to_pdf("./photos", "photos.pdf", &config).await?;
//!     println!("{} pages, {} bytes", stats.processed_images, stats.output_bytes);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `images2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! images2pdf = { version = "0.3", default-features = false }
//! ```
//!
//! ## Batch behaviour
//!
//! * Page order is the case-insensitive lexicographic order of file names,
//!   independent of how the host enumerated them.
//! * Per-image failures (unreadable bytes, zero-size geometry, over the
//!   50 MB size policy) are skipped with a warning and an error-tagged
//!   progress event; the batch continues.
//! * Batches over 1000 images require an explicit [`BatchConfirmation`]
//!   before any work starts.
//! * The driver is strictly sequential and pauses periodically
//!   ([`PacingPolicy`]) so peak memory stays at one image in flight and
//!   the host scheduler keeps breathing.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod source;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    AlwaysConfirm, BatchConfirmation, PacingPolicy, PageOrientation, PageSize, PdfConfig,
    PdfConfigBuilder,
};
pub use convert::{
    convert_and_deliver, convert_dir_to_pdf, convert_images_to_pdf, convert_images_to_pdf_sync,
    convert_remote_images_to_pdf, DEFAULT_OUTPUT_NAME,
};
pub use error::{ImageError, Images2PdfError};
pub use output::{ConversionOutput, ConversionStats, ItemRecord};
pub use pipeline::layout::{LayoutRect, CAPTION_BAND_MM};
pub use pipeline::select::{is_supported_mime, is_supported_name, SUPPORTED_EXTENSIONS};
pub use pipeline::sink::{DocumentSink, FileSink, MemorySink};
pub use progress::{
    ConversionProgress, ConversionProgressCallback, NoopProgressCallback, ProgressCallback,
};
pub use source::{fetch_remote, list_dir, ImageSource, SourceData};
