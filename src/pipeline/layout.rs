//! Page layout: fit one image into the printable area.
//!
//! Pure geometry in page units (millimetres). The printable area is the
//! page minus the margins minus a fixed-height caption band reserved at the
//! bottom for the file name and page-number footer. The image is scaled to
//! fit, preserving its aspect ratio, centered horizontally and top-aligned
//! at the margin.

use crate::error::ImageError;

/// Height of the strip at the bottom of each page reserved for caption and
/// page-number text.
pub const CAPTION_BAND_MM: f32 = 20.0;

/// Caption baseline, measured up from the bottom page edge.
pub const CAPTION_BASELINE_MM: f32 = 10.0;

/// Placement rectangle in page units; `(x, y)` is the top-left corner
/// measured from the top-left of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Compute the placement rectangle for an image of `img_w` x `img_h`
/// pixels on a `page_w` x `page_h` mm page.
///
/// `scale = min(max_w / img_w, max_h / img_h)` where the maxima are the
/// printable area; small images are scaled up to fill it, matching the
/// page-filling behaviour of the interactive converter.
pub fn layout(
    name: &str,
    img_w: u32,
    img_h: u32,
    page_w: f32,
    page_h: f32,
    margin: f32,
    caption_band: f32,
) -> Result<LayoutRect, ImageError> {
    if img_w == 0 || img_h == 0 {
        return Err(ImageError::InvalidDimensions {
            name: name.to_string(),
            width: img_w,
            height: img_h,
        });
    }

    let max_w = page_w - 2.0 * margin;
    let max_h = page_h - 2.0 * margin - caption_band;

    let scale = (max_w / img_w as f32).min(max_h / img_h as f32);
    let width = img_w as f32 * scale;
    let height = img_h as f32 * scale;

    Ok(LayoutRect {
        x: (page_w - width) / 2.0,
        y: margin,
        width,
        height,
    })
}
