//! Progress-callback trait for per-image conversion events.
//!
//! Inject an `Arc<dyn ConversionProgressCallback>` via
//! [`crate::config::PdfConfigBuilder::progress_callback`] to receive an
//! event after every image attempt as the driver works through the batch.
//!
//! Events are delivered synchronously from the conversion loop — never
//! batched or buffered — so a terminal progress bar, a WebSocket forwarder,
//! or a database recorder all see the batch advance in real time without
//! the library knowing anything about how the host communicates.

use crate::error::ImageError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A snapshot of batch progress, emitted after each image attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionProgress {
    /// 1-based index of the attempted image.
    pub current: usize,
    /// Total images in the batch (after filtering).
    pub total: usize,
    /// Rounded percentage of attempts completed, 0–100.
    pub percentage: u8,
    /// Display name of the attempted image; error-tagged on failure.
    pub current_label: String,
}

impl ConversionProgress {
    /// Snapshot for a successful attempt.
    pub fn success(current: usize, total: usize, name: &str) -> Self {
        Self {
            current,
            total,
            percentage: Self::percentage_of(current, total),
            current_label: name.to_string(),
        }
    }

    /// Snapshot for a failed attempt; the label carries an error tag so
    /// plain-text consumers can tell the two apart.
    pub fn failure(current: usize, total: usize, name: &str) -> Self {
        Self {
            current,
            total,
            percentage: Self::percentage_of(current, total),
            current_label: format!("error: {name}"),
        }
    }

    fn percentage_of(current: usize, total: usize) -> u8 {
        if total == 0 {
            return 100;
        }
        ((current as f64 / total as f64) * 100.0).round() as u8
    }
}

/// Called by the conversion driver as it processes each image.
///
/// Implementations must be `Send + Sync`. All methods have default no-op
/// implementations so callers only override what they care about. The
/// driver is strictly sequential, so calls never overlap.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any image is processed.
    fn on_conversion_start(&self, total: usize) {
        let _ = total;
    }

    /// Called after an image was successfully placed on its page.
    fn on_image_complete(&self, progress: &ConversionProgress) {
        let _ = progress;
    }

    /// Called after an image attempt failed and was skipped.
    /// `progress.current_label` is already error-tagged.
    fn on_image_error(&self, progress: &ConversionProgress, error: &ImageError) {
        let _ = (progress, error);
    }

    /// Called once after all images have been attempted.
    fn on_conversion_complete(&self, total: usize, succeeded: usize) {
        let _ = (total, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PdfConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
