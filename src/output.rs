//! Result types returned by the conversion driver.

use crate::error::ImageError;
use serde::{Deserialize, Serialize};

/// The outcome of one conversion run: the serialised PDF plus a record of
/// what happened to every attempted item.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The finished document.
    pub pdf: Vec<u8>,
    /// One record per attempted image, in attempt (= page) order.
    pub items: Vec<ItemRecord>,
    /// Aggregate counters.
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Display names of the committed pages, in page order.
    pub fn page_names(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|i| i.page.is_some())
            .map(|i| i.name.as_str())
            .collect()
    }
}

/// What happened to one batch item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    /// 1-based attempt index within the batch.
    pub index: usize,
    /// Display name (the page caption on success).
    pub name: String,
    /// 1-based page number in the document, if a page was committed.
    pub page: Option<usize>,
    /// The error that caused the item to be skipped, if any.
    pub error: Option<ImageError>,
}

/// Aggregate statistics for a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Candidates supplied before filtering.
    pub total_candidates: usize,
    /// Candidates dropped by the format filter.
    pub filtered_out: usize,
    /// Images attempted (candidates minus filtered).
    pub total_images: usize,
    /// Images that produced a page.
    pub processed_images: usize,
    /// Images skipped by a per-item error.
    pub failed_images: usize,
    /// Size of the serialised document in bytes.
    pub output_bytes: usize,
    /// Wall-clock duration of the whole run.
    pub total_duration_ms: u64,
}
