//! Batch conversion driver: the sequential loop that turns an ordered set
//! of image sources into one multi-page PDF.
//!
//! ## Error isolation
//!
//! A batch never fails because one image does. Per-item errors are caught
//! at the item boundary, logged, surfaced through the progress channel
//! with an error-tagged label, and the loop continues; the failed item
//! commits no page. Only three things are fatal: an empty selection, a
//! declined large-batch confirmation, and a document/sink failure.
//!
//! ## Memory model
//!
//! Items are processed strictly sequentially — decode, layout and draw for
//! image N+1 start only after image N's buffers are dropped, so peak
//! memory is one image in flight regardless of batch size. The
//! [`PacingPolicy`] additionally yields the scheduler after every few
//! items and rests longer at batch boundaries so the host stays responsive
//! and transient allocations can be reclaimed.

use crate::config::{PacingPolicy, PdfConfig};
use crate::error::{ImageError, Images2PdfError};
use crate::output::{ConversionOutput, ConversionStats, ItemRecord};
use crate::pipeline::layout::CAPTION_BAND_MM;
use crate::pipeline::prepare::PrepareOptions;
use crate::pipeline::sink::{DocumentSink, FileSink};
use crate::pipeline::{compose, layout, prepare, select, sink};
use crate::progress::ConversionProgress;
use crate::source::{self, ImageSource};
use printpdf::{PdfDocument, PdfPage};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Output file name used when the caller does not provide one.
pub const DEFAULT_OUTPUT_NAME: &str = "images-collection.pdf";

/// Convert a batch of image sources into a single PDF.
///
/// Filters unsupported candidates, sorts the rest into canonical order,
/// and processes them sequentially. Returns `Ok` even if some images
/// failed (check `output.stats.failed_images`).
///
/// # Errors
/// Fatal only: empty selection after filtering, declined large-batch
/// confirmation, every image failing, or a document serialisation error.
pub async fn convert_images_to_pdf(
    sources: Vec<ImageSource>,
    config: &PdfConfig,
) -> Result<ConversionOutput, Images2PdfError> {
    let started = Instant::now();

    let total_candidates = sources.len();
    let (mut batch, filtered_out) = select::filter_sources(sources);
    if filtered_out > 0 {
        debug!("format filter dropped {filtered_out} of {total_candidates} candidates");
    }
    if batch.is_empty() {
        return Err(Images2PdfError::EmptySelection);
    }
    select::sort_sources(&mut batch);

    let total = batch.len();
    confirm_if_large(total, config)?;

    let pacing = config
        .pacing
        .unwrap_or_else(|| PacingPolicy::for_batch(total));
    let prep_opts = PrepareOptions::from_config(config);
    let (page_w_mm, page_h_mm) = config.page_dimensions_mm();

    info!("converting {total} images ({filtered_out} filtered out)");
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    let mut doc = PdfDocument::new("Image Collection");
    let mut pages: Vec<PdfPage> = Vec::new();
    let mut items: Vec<ItemRecord> = Vec::with_capacity(total);
    let mut succeeded = 0usize;

    for (i, src) in batch.into_iter().enumerate() {
        let current = i + 1;
        let name = src.name.clone();

        match process_item(
            &mut doc,
            src,
            prep_opts,
            page_w_mm,
            page_h_mm,
            succeeded + 1,
            total,
            config,
        )
        .await
        {
            Ok(page) => {
                pages.push(page);
                succeeded += 1;
                debug!("placed '{name}' as page {succeeded}");
                items.push(ItemRecord {
                    index: current,
                    name: name.clone(),
                    page: Some(succeeded),
                    error: None,
                });
                if let Some(ref cb) = config.progress_callback {
                    cb.on_image_complete(&ConversionProgress::success(current, total, &name));
                }
            }
            Err(e) => {
                warn!("skipping '{name}': {e}");
                if let Some(ref cb) = config.progress_callback {
                    cb.on_image_error(&ConversionProgress::failure(current, total, &name), &e);
                }
                items.push(ItemRecord {
                    index: current,
                    name,
                    page: None,
                    error: Some(e),
                });
            }
        }

        // voluntary suspension points; nothing owed after the last item
        if current < total {
            if let Some(pause) = pacing.pause_after(current) {
                tokio::time::sleep(pause).await;
            }
        }
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total, succeeded);
    }

    if succeeded == 0 {
        let first_error = items
            .iter()
            .find_map(|r| r.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(Images2PdfError::NoImagesProcessed { total, first_error });
    }

    doc.with_pages(pages);
    let pdf = sink::finalize(doc)?;

    let stats = ConversionStats {
        total_candidates,
        filtered_out,
        total_images: total,
        processed_images: succeeded,
        failed_images: total - succeeded,
        output_bytes: pdf.len(),
        total_duration_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        "conversion complete: {}/{} images, {} bytes, {}ms",
        succeeded, total, stats.output_bytes, stats.total_duration_ms
    );

    Ok(ConversionOutput { pdf, items, stats })
}

/// Convert and hand the result to a delivery sink.
pub async fn convert_and_deliver(
    sources: Vec<ImageSource>,
    config: &PdfConfig,
    filename: &str,
    sink: &dyn DocumentSink,
) -> Result<ConversionStats, Images2PdfError> {
    let output = convert_images_to_pdf(sources, config).await?;
    sink.deliver(&output.pdf, filename)?;
    Ok(output.stats)
}

/// Convert every supported image in a flat directory into `output`.
///
/// This is the script-mode entry point: list, filter, sort, convert,
/// write.
pub async fn convert_dir_to_pdf(
    folder: impl AsRef<Path>,
    output: &str,
    config: &PdfConfig,
) -> Result<ConversionStats, Images2PdfError> {
    let folder = folder.as_ref();
    let sources = source::list_dir(folder)?;

    convert_and_deliver(sources, config, output, &FileSink)
        .await
        .map_err(|e| match e {
            // give the empty case its folder-specific message
            Images2PdfError::EmptySelection => Images2PdfError::NoSupportedImages {
                path: folder.to_path_buf(),
            },
            other => other,
        })
}

/// Fetch each path as bytes first, then delegate to the same pipeline.
///
/// Paths may be HTTP/HTTPS URLs or server-relative asset paths; fetch
/// failures are logged and skipped.
pub async fn convert_remote_images_to_pdf(
    paths: &[String],
    config: &PdfConfig,
    filename: &str,
    sink: &dyn DocumentSink,
) -> Result<ConversionStats, Images2PdfError> {
    let sources = source::fetch_remote(paths).await?;
    convert_and_deliver(sources, config, filename, sink).await
}

/// Synchronous wrapper around [`convert_images_to_pdf`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_images_to_pdf_sync(
    sources: Vec<ImageSource>,
    config: &PdfConfig,
) -> Result<ConversionOutput, Images2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Images2PdfError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(convert_images_to_pdf(sources, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Enforce the large-batch gate before any work starts.
///
/// Declining — or having no confirmer configured at all — cancels the
/// operation; no partial document is produced.
fn confirm_if_large(total: usize, config: &PdfConfig) -> Result<(), Images2PdfError> {
    if total <= config.large_batch_threshold {
        return Ok(());
    }
    let confirmed = config
        .confirmation
        .as_ref()
        .map(|c| c.confirm_large_batch(total))
        .unwrap_or(false);
    if confirmed {
        info!("large batch of {total} images confirmed");
        Ok(())
    } else {
        Err(Images2PdfError::CancelledByUser { total })
    }
}

/// One item end to end: prepare → layout → compose.
///
/// Any `Err` here is recoverable at the batch level; no page has been
/// committed for the item when this returns an error.
#[allow(clippy::too_many_arguments)]
async fn process_item(
    doc: &mut PdfDocument,
    src: ImageSource,
    prep_opts: PrepareOptions,
    page_w_mm: f32,
    page_h_mm: f32,
    page_number: usize,
    total: usize,
    config: &PdfConfig,
) -> Result<PdfPage, ImageError> {
    let name = src.name.clone();

    let prepared = prepare::prepare(src, prep_opts).await?;
    let rect = layout::layout(
        &name,
        prepared.width,
        prepared.height,
        page_w_mm,
        page_h_mm,
        config.margin_mm,
        CAPTION_BAND_MM,
    )?;

    Ok(compose::image_page(
        doc,
        prepared,
        &rect,
        &name,
        page_number,
        total,
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlwaysConfirm;
    use std::sync::Arc;

    #[test]
    fn under_threshold_needs_no_confirmer() {
        let config = PdfConfig::default();
        assert!(confirm_if_large(10, &config).is_ok());
    }

    #[test]
    fn over_threshold_without_confirmer_is_cancelled() {
        let config = PdfConfig::builder()
            .large_batch_threshold(5)
            .build()
            .unwrap();
        let err = confirm_if_large(6, &config);
        assert!(matches!(
            err,
            Err(Images2PdfError::CancelledByUser { total: 6 })
        ));
    }

    #[test]
    fn over_threshold_with_confirmer_proceeds() {
        let config = PdfConfig::builder()
            .large_batch_threshold(5)
            .confirmation(Arc::new(AlwaysConfirm))
            .build()
            .unwrap();
        assert!(confirm_if_large(6, &config).is_ok());
    }

    #[tokio::test]
    async fn empty_selection_is_fatal() {
        let err = convert_images_to_pdf(Vec::new(), &PdfConfig::default()).await;
        assert!(matches!(err, Err(Images2PdfError::EmptySelection)));
    }

    #[tokio::test]
    async fn all_unsupported_is_an_empty_selection() {
        let sources = vec![
            ImageSource::from_bytes("a.txt", b"x".to_vec()),
            ImageSource::from_bytes("b.pdf", b"y".to_vec()),
        ];
        let err = convert_images_to_pdf(sources, &PdfConfig::default()).await;
        assert!(matches!(err, Err(Images2PdfError::EmptySelection)));
    }

    #[tokio::test]
    async fn all_failing_images_yield_no_document() {
        let sources = vec![
            ImageSource::from_bytes("a.png", b"garbage".to_vec()),
            ImageSource::from_bytes("b.png", b"more garbage".to_vec()),
        ];
        let err = convert_images_to_pdf(sources, &PdfConfig::default()).await;
        match err {
            Err(Images2PdfError::NoImagesProcessed { total, first_error }) => {
                assert_eq!(total, 2);
                assert!(first_error.contains("a.png"), "got: {first_error}");
            }
            other => panic!("expected NoImagesProcessed, got {other:?}"),
        }
    }
}
