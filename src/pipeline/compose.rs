//! Page composition — turn a prepared image and its layout into `printpdf`
//! drawing operations.
//!
//! printpdf 0.8 uses a data-oriented API: documents are built by
//! constructing `PdfPage` structs containing `Vec<Op>` operation lists.
//! Pages use a bottom-left origin in points, while the layout engine works
//! top-left in millimetres, so the translation happens here and nowhere
//! else.

use crate::config::PdfConfig;
use crate::pipeline::layout::{LayoutRect, CAPTION_BASELINE_MM};
use crate::pipeline::prepare::PreparedImage;
use printpdf::{
    BuiltinFont, Color, Mm, Op, PdfDocument, PdfPage, Point, Pt, RawImage, RawImageData,
    RawImageFormat, Rgb, TextItem, XObjectId, XObjectTransform,
};

/// Footer ("N / total") font size in points.
const FOOTER_FONT_SIZE_PT: f32 = 8.0;

/// Caption and footer text colour: the 100/255 gray of the original pages.
const TEXT_GRAY: f32 = 100.0 / 255.0;

/// Register `prepared` with the document and build its page.
///
/// `page_number` is the 1-based ordinal among committed pages; `total` is
/// the batch size after filtering.
pub fn image_page(
    doc: &mut PdfDocument,
    prepared: PreparedImage,
    rect: &LayoutRect,
    caption: &str,
    page_number: usize,
    total: usize,
    config: &PdfConfig,
) -> PdfPage {
    let (page_w_mm, page_h_mm) = config.page_dimensions_mm();
    let (img_w, img_h) = (prepared.width, prepared.height);

    let raw = RawImage {
        pixels: RawImageData::U8(prepared.pixels),
        width: img_w as usize,
        height: img_h as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let xobject_id = doc.add_image(&raw);

    let ops = build_page_ops(
        xobject_id,
        img_w,
        img_h,
        rect,
        caption,
        page_number,
        total,
        config,
    );
    PdfPage::new(Mm(page_w_mm), Mm(page_h_mm), ops)
}

/// The full op list for one page: placed image, caption, footer.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_page_ops(
    xobject_id: XObjectId,
    img_w_px: u32,
    img_h_px: u32,
    rect: &LayoutRect,
    caption: &str,
    page_number: usize,
    total: usize,
    config: &PdfConfig,
) -> Vec<Op> {
    let (page_w_mm, page_h_mm) = config.page_dimensions_mm();
    let page_w_pt = Mm(page_w_mm).into_pt().0;
    let page_h_pt = Mm(page_h_mm).into_pt().0;
    let margin_pt = Mm(config.margin_mm).into_pt().0;

    let target_w_pt = Mm(rect.width).into_pt().0;
    let target_h_pt = Mm(rect.height).into_pt().0;
    let x_pt = Mm(rect.x).into_pt().0;
    // layout y is from the top edge; the page origin is bottom-left
    let y_pt = page_h_pt - Mm(rect.y).into_pt().0 - target_h_pt;

    let mut ops = Vec::with_capacity(16);

    // At 72 dpi the image's native size is one point per pixel, so the
    // scale factors map pixels straight onto the layout rectangle.
    ops.push(Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(x_pt)),
            translate_y: Some(Pt(y_pt)),
            scale_x: Some(target_w_pt / img_w_px as f32),
            scale_y: Some(target_h_pt / img_h_px as f32),
            dpi: Some(72.0),
            rotate: None,
        },
    });

    let baseline_pt = Mm(CAPTION_BASELINE_MM).into_pt().0;
    ops.push(Op::SetFillColor {
        col: Color::Rgb(Rgb {
            r: TEXT_GRAY,
            g: TEXT_GRAY,
            b: TEXT_GRAY,
            icc_profile: None,
        }),
    });

    // caption: display name, bottom-left
    ops.extend(text_at(
        caption,
        Pt(margin_pt),
        Pt(baseline_pt),
        config.font_size,
    ));

    // footer: "N / total", right-aligned against the opposite margin
    let footer = format!("{page_number} / {total}");
    let footer_x = page_w_pt - margin_pt - estimated_text_width_pt(&footer, FOOTER_FONT_SIZE_PT);
    ops.extend(text_at(&footer, Pt(footer_x), Pt(baseline_pt), FOOTER_FONT_SIZE_PT));

    ops
}

/// One builtin-font text run at an absolute position.
fn text_at(text: &str, x: Pt, y: Pt, font_size_pt: f32) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point { x, y },
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(font_size_pt),
            font: BuiltinFont::Helvetica,
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font: BuiltinFont::Helvetica,
        },
        Op::EndTextSection,
    ]
}

/// Estimated Helvetica advance width: average glyph width is roughly
/// 0.50 × font size.
pub(crate) fn estimated_text_width_pt(text: &str, font_size_pt: f32) -> f32 {
    0.50 * font_size_pt * text.chars().count() as f32
}
