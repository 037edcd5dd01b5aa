//! Configuration types for image-batch-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`PdfConfig`], built via
//! its [`PdfConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across calls, serialise the scalar parts for
//! logging, and diff two runs to understand why their outputs differ.
//!
//! There is deliberately no module-level default config: callers pass an
//! explicit `PdfConfig` (or `PdfConfig::default()`) into the driver.

use crate::error::Images2PdfError;
use crate::pipeline::layout::CAPTION_BAND_MM;
use crate::progress::ConversionProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for one conversion run.
///
/// Built via [`PdfConfig::builder()`] or using [`PdfConfig::default()`].
/// Immutable for the duration of a run.
///
/// # Example
/// ```rust
/// use images2pdf::{PdfConfig, PageOrientation, PageSize};
///
/// let config = PdfConfig::builder()
///     .quality(0.9)
///     .orientation(PageOrientation::Landscape)
///     .page_size(PageSize::Letter)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PdfConfig {
    /// Page margin in millimetres on all four sides. Default: 20.
    pub margin_mm: f32,

    /// Caption font size in points. Default: 10.
    pub font_size: f32,

    /// Image re-encode quality, 0.1–1.0. Default: 0.8.
    ///
    /// Below 1.0 each decoded image is passed through a JPEG re-encode at
    /// this quality before being placed, bounding the embedded pixel data.
    /// Values outside the range are clamped rather than rejected.
    pub quality: f32,

    /// Page orientation. Default: portrait.
    pub orientation: PageOrientation,

    /// Page size. Default: A4.
    pub page_size: PageSize,

    /// Maximum byte size of a single source image. Default: 50 MB.
    ///
    /// Sources over this limit are skipped with a warning; they never abort
    /// the batch.
    pub max_source_bytes: u64,

    /// Item count above which the batch requires explicit confirmation
    /// before any work starts. Default: 1000.
    pub large_batch_threshold: usize,

    /// Override for the yield/pause cadence. `None` derives a policy from
    /// the batch size via [`PacingPolicy::for_batch`].
    pub pacing: Option<PacingPolicy>,

    /// Progress events, delivered synchronously after every image attempt.
    pub progress_callback: Option<Arc<dyn ConversionProgressCallback>>,

    /// Decision point for batches over [`Self::large_batch_threshold`].
    /// With no confirmer configured, an over-threshold batch is treated as
    /// declined.
    pub confirmation: Option<Arc<dyn BatchConfirmation>>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            margin_mm: 20.0,
            font_size: 10.0,
            quality: 0.8,
            orientation: PageOrientation::Portrait,
            page_size: PageSize::A4,
            max_source_bytes: 50 * 1024 * 1024,
            large_batch_threshold: 1000,
            pacing: None,
            progress_callback: None,
            confirmation: None,
        }
    }
}

impl fmt::Debug for PdfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfConfig")
            .field("margin_mm", &self.margin_mm)
            .field("font_size", &self.font_size)
            .field("quality", &self.quality)
            .field("orientation", &self.orientation)
            .field("page_size", &self.page_size)
            .field("max_source_bytes", &self.max_source_bytes)
            .field("large_batch_threshold", &self.large_batch_threshold)
            .field("pacing", &self.pacing)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .field(
                "confirmation",
                &self.confirmation.as_ref().map(|_| "<dyn confirmation>"),
            )
            .finish()
    }
}

impl PdfConfig {
    /// Create a new builder for `PdfConfig`.
    pub fn builder() -> PdfConfigBuilder {
        PdfConfigBuilder {
            config: Self::default(),
        }
    }

    /// Page dimensions in millimetres with orientation applied
    /// (width, height).
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions_mm();
        match self.orientation {
            PageOrientation::Portrait => (w, h),
            PageOrientation::Landscape => (h, w),
        }
    }
}

/// Builder for [`PdfConfig`].
#[derive(Debug)]
pub struct PdfConfigBuilder {
    config: PdfConfig,
}

impl PdfConfigBuilder {
    pub fn margin_mm(mut self, mm: f32) -> Self {
        self.config.margin_mm = mm.max(0.0);
        self
    }

    pub fn font_size(mut self, pt: f32) -> Self {
        self.config.font_size = pt.clamp(4.0, 48.0);
        self
    }

    pub fn quality(mut self, q: f32) -> Self {
        self.config.quality = q.clamp(0.1, 1.0);
        self
    }

    pub fn orientation(mut self, o: PageOrientation) -> Self {
        self.config.orientation = o;
        self
    }

    pub fn page_size(mut self, s: PageSize) -> Self {
        self.config.page_size = s;
        self
    }

    pub fn max_source_bytes(mut self, bytes: u64) -> Self {
        self.config.max_source_bytes = bytes.max(1);
        self
    }

    pub fn large_batch_threshold(mut self, n: usize) -> Self {
        self.config.large_batch_threshold = n.max(1);
        self
    }

    pub fn pacing(mut self, policy: PacingPolicy) -> Self {
        self.config.pacing = Some(policy);
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn ConversionProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn confirmation(mut self, c: Arc<dyn BatchConfirmation>) -> Self {
        self.config.confirmation = Some(c);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PdfConfig, Images2PdfError> {
        let c = &self.config;
        let (page_w, page_h) = c.page_dimensions_mm();
        if 2.0 * c.margin_mm >= page_w || 2.0 * c.margin_mm + CAPTION_BAND_MM >= page_h {
            return Err(Images2PdfError::InvalidConfig(format!(
                "margin {}mm leaves no printable area on a {}x{}mm page",
                c.margin_mm, page_w, page_h
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

/// Supported page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
        }
    }
}

// ── Pacing ───────────────────────────────────────────────────────────────

/// Yield/pause cadence for the sequential conversion loop.
///
/// The driver sleeps briefly after every `yield_every` items so the host
/// scheduler gets control back, and sleeps longer at every `batch_size`
/// boundary so transient decode buffers can be reclaimed before the next
/// slice of work. Neither pause affects correctness; both bound peak
/// memory and keep the host responsive on large batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingPolicy {
    /// Short pause after every this-many items.
    pub yield_every: usize,
    /// Duration of the short pause.
    pub yield_pause: Duration,
    /// Longer pause after every this-many items.
    pub batch_size: usize,
    /// Duration of the longer pause.
    pub batch_pause: Duration,
}

impl PacingPolicy {
    /// Derive a cadence from the total batch size.
    ///
    /// Small batches barely pause at all; large ones yield more often and
    /// rest longer at batch boundaries.
    pub fn for_batch(total: usize) -> Self {
        if total <= 100 {
            Self {
                yield_every: 5,
                yield_pause: Duration::from_millis(10),
                batch_size: 10,
                batch_pause: Duration::from_millis(100),
            }
        } else if total <= 500 {
            Self {
                yield_every: 5,
                yield_pause: Duration::from_millis(20),
                batch_size: 25,
                batch_pause: Duration::from_millis(250),
            }
        } else {
            Self {
                yield_every: 10,
                yield_pause: Duration::from_millis(30),
                batch_size: 50,
                batch_pause: Duration::from_millis(500),
            }
        }
    }

    /// Pause owed after finishing the item at 1-based `index`, if any.
    /// A batch boundary wins over an ordinary yield point.
    pub fn pause_after(&self, index: usize) -> Option<Duration> {
        if self.batch_size > 0 && index % self.batch_size == 0 {
            Some(self.batch_pause)
        } else if self.yield_every > 0 && index % self.yield_every == 0 {
            Some(self.yield_pause)
        } else {
            None
        }
    }
}

// ── Confirmation ─────────────────────────────────────────────────────────

/// Yes/no decision point for batches over the large-batch threshold.
///
/// The CLI implements this with an interactive prompt; tests and
/// non-interactive callers use [`AlwaysConfirm`] or their own policy.
pub trait BatchConfirmation: Send + Sync {
    /// Return `true` to proceed with a batch of `total` images.
    fn confirm_large_batch(&self, total: usize) -> bool;
}

/// A confirmation policy that always proceeds.
pub struct AlwaysConfirm;

impl BatchConfirmation for AlwaysConfirm {
    fn confirm_large_batch(&self, _total: usize) -> bool {
        true
    }
}
