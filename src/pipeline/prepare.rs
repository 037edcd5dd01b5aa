//! Image preparation: decode one source, bound its size, re-encode at the
//! configured quality.
//!
//! ## Why spawn_blocking?
//!
//! Decoding and resampling are CPU-bound; running them on a Tokio worker
//! thread would stall the async scheduler for the duration of a large
//! decode. `tokio::task::spawn_blocking` moves the work onto the blocking
//! pool, and because the driver awaits each item before starting the next,
//! at most one image's decode buffers are alive at a time.
//!
//! ## Why cap pixels, not bytes?
//!
//! A 4 MB JPEG can decode to a 200 MB pixel buffer. The longest-side cap
//! (2048 px at quality ≥ 0.5, 1536 px below) bounds the decoded raster —
//! and with it the embedded page data — regardless of how well the source
//! was compressed. The byte-size guard exists separately to refuse
//! pathological sources before any decode work happens.
//!
//! Every intermediate buffer (source bytes, full-resolution decode,
//! re-encode scratch) is dropped before this stage returns.

use crate::config::PdfConfig;
use crate::error::ImageError;
use crate::source::ImageSource;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::RgbImage;
use std::io::Cursor;
use tracing::debug;

/// A decoded image ready to embed: tightly packed RGB8 pixels.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// The scalar knobs the preparer needs, detached from [`PdfConfig`] so the
/// work can move onto the blocking pool without dragging callbacks along.
#[derive(Debug, Clone, Copy)]
pub struct PrepareOptions {
    pub quality: f32,
    pub max_source_bytes: u64,
}

impl PrepareOptions {
    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            quality: config.quality,
            max_source_bytes: config.max_source_bytes,
        }
    }
}

/// Decode `source` and return an embeddable raster.
///
/// Consumes the source — each batch item is prepared exactly once.
pub async fn prepare(
    source: ImageSource,
    opts: PrepareOptions,
) -> Result<PreparedImage, ImageError> {
    let name = source.name.clone();
    tokio::task::spawn_blocking(move || prepare_blocking(&source, opts))
        .await
        .unwrap_or_else(|e| {
            Err(ImageError::Decode {
                name,
                detail: format!("prepare task panicked: {e}"),
            })
        })
}

/// Blocking implementation of [`prepare`].
pub(crate) fn prepare_blocking(
    source: &ImageSource,
    opts: PrepareOptions,
) -> Result<PreparedImage, ImageError> {
    let name = &source.name;

    let len = source.byte_len()?;
    if len > opts.max_source_bytes {
        return Err(ImageError::Oversize {
            name: name.clone(),
            bytes: len,
            limit: opts.max_source_bytes,
        });
    }

    let mut rgb: RgbImage = {
        let bytes = source.read_bytes()?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| ImageError::Decode {
            name: name.clone(),
            detail: e.to_string(),
        })?;
        // `bytes` and the non-RGB decode drop here, before any resampling
        decoded.to_rgb8()
    };

    let (w, h) = rgb.dimensions();
    if w == 0 || h == 0 {
        return Err(ImageError::InvalidDimensions {
            name: name.clone(),
            width: w,
            height: h,
        });
    }

    let cap = max_dimension_for_quality(opts.quality);
    let longest = w.max(h);
    if longest > cap {
        let factor = cap as f32 / longest as f32;
        let new_w = ((w as f32 * factor).round() as u32).max(1);
        let new_h = ((h as f32 * factor).round() as u32).max(1);
        debug!("downscaling '{name}' {w}x{h} -> {new_w}x{new_h}");
        rgb = image::imageops::resize(&rgb, new_w, new_h, FilterType::Triangle);
    }

    if opts.quality < 1.0 {
        rgb = reencode_at_quality(rgb, opts.quality).map_err(|detail| ImageError::Decode {
            name: name.clone(),
            detail,
        })?;
    }

    let (width, height) = rgb.dimensions();
    Ok(PreparedImage {
        pixels: rgb.into_raw(),
        width,
        height,
    })
}

/// Longest-side cap in pixels for a given quality setting.
fn max_dimension_for_quality(quality: f32) -> u32 {
    if quality >= 0.5 {
        2048
    } else {
        1536
    }
}

/// JPEG encode/decode round at the given quality, reproducing the lossy
/// raster-surface re-encode of the interactive converter.
fn reencode_at_quality(rgb: RgbImage, quality: f32) -> Result<RgbImage, String> {
    let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let mut buf = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(
        &mut Cursor::new(&mut buf),
        q,
    ))
    .map_err(|e| e.to_string())?;
    let reread = image::load_from_memory(&buf).map_err(|e| e.to_string())?;
    Ok(reread.to_rgb8())
}
