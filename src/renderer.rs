//! The canvas compositor: turns a document, an optional background bitmap,
//! and the current selection into the raster that is shown on screen and
//! exported. Rendering is a pure function of its inputs; identical inputs
//! produce identical pixels. The selection overlay is the only
//! mode-dependent output and is skipped entirely in export mode.

use image::{Rgba, RgbaImage};

use crate::document::Document;
use crate::element::Element;
use crate::fonts::{FontFamily, FontStore};
use crate::raster;
use crate::text;

/// Neutral background shown while no bitmap is loaded.
const PLACEHOLDER_FILL: Rgba<u8> = Rgba([0xf3, 0xf4, 0xf6, 255]);
const PLACEHOLDER_TEXT_COLOR: Rgba<u8> = Rgba([0x9c, 0xa3, 0xaf, 255]);
const PLACEHOLDER_LABEL: &str = "جاري تحميل القالب...";
const PLACEHOLDER_SIZE: f32 = 60.0;

/// Horizontal overhang of the strike mark past the text, in pixels.
const STRIKE_EXTENSION: f32 = 25.0;
const STRIKE_HALO: Rgba<u8> = Rgba([255, 255, 255, 255]);
const STRIKE_ACCENT: Rgba<u8> = Rgba([0xef, 0x44, 0x44, 255]);
const STRIKE_SHADOW: Rgba<u8> = Rgba([0, 0, 0, 255]);
const STRIKE_SHADOW_OPACITY: f32 = 0.3;
const STRIKE_SHADOW_OFFSET: f32 = 2.0;

const SELECTION_COLOR: Rgba<u8> = Rgba([0x22, 0xc5, 0x5e, 255]);
const SELECTION_LINE_WIDTH: f32 = 4.0;
const SELECTION_DASH_ON: f32 = 10.0;
const SELECTION_DASH_OFF: f32 = 5.0;
const SELECTION_PAD_X: f32 = 20.0;
const SELECTION_PAD_Y: f32 = 10.0;

/// Endpoints of the diagonal strike mark for one rendered line: the segment
/// rises left to right, overhangs the text by [`STRIKE_EXTENSION`] on each
/// side, and slants by a tenth of the font size.
pub fn strike_segment(
    x: f32,
    line_y: f32,
    text_width: f32,
    font_size: f32,
) -> ((f32, f32), (f32, f32)) {
    let slant = font_size * 0.1;
    let start = (x - text_width / 2.0 - STRIKE_EXTENSION, line_y + slant);
    let end = (x + text_width / 2.0 + STRIKE_EXTENSION, line_y - slant);
    (start, end)
}

/// The dashed selection box around an element's measured bounds, as
/// `(min, size)` in document pixels. The box is re-centered vertically by
/// the offset between the first line's center and the block anchor.
pub fn selection_rect(el: &Element, fonts: &FontStore) -> ((f32, f32), (f32, f32)) {
    let max_width = fonts.measure_block(el.font, el.font_size, &el.text);
    let line_height = el.line_height();
    let stack_height = el.lines().len() as f32 * line_height;
    let w = if max_width > 0.0 { max_width } else { 50.0 };
    let h = if stack_height > 0.0 {
        stack_height
    } else {
        el.font_size
    };
    let min = (
        el.x - w / 2.0 - SELECTION_PAD_X,
        el.y - h / 2.0 - SELECTION_PAD_Y + line_height / 2.0 - el.font_size / 2.0,
    );
    (min, (w + 2.0 * SELECTION_PAD_X, h + 2.0 * SELECTION_PAD_Y))
}

/// Render the document at its full pixel size.
///
/// `highlight` is the element that gets the dashed selection box (the
/// selected element, or the one being dragged); it is ignored when
/// `export_mode` is set.
pub fn render_document(
    doc: &Document,
    background: Option<&RgbaImage>,
    highlight: Option<&str>,
    export_mode: bool,
    fonts: &FontStore,
) -> RgbaImage {
    let mut surface = RgbaImage::new(doc.width.max(1), doc.height.max(1));

    match background {
        Some(bg) => raster::blit_scaled(&mut surface, bg),
        None => {
            raster::fill(&mut surface, PLACEHOLDER_FILL);
            draw_placeholder_label(&mut surface, doc, fonts);
        }
    }

    for el in &doc.elements {
        draw_element(&mut surface, el, fonts);
        if !export_mode && highlight == Some(el.id.as_str()) {
            let (min, size) = selection_rect(el, fonts);
            raster::draw_dashed_rect(
                &mut surface,
                min,
                (min.0 + size.0, min.1 + size.1),
                SELECTION_DASH_ON,
                SELECTION_DASH_OFF,
                SELECTION_LINE_WIDTH,
                SELECTION_COLOR,
            );
        }
    }

    surface
}

fn draw_placeholder_label(surface: &mut RgbaImage, doc: &Document, fonts: &FontStore) {
    let cx = doc.width as f32 / 2.0;
    let cy = doc.height as f32 / 2.0;
    if let Some(mask) =
        text::rasterize_line(fonts, FontFamily::Cairo, PLACEHOLDER_SIZE, PLACEHOLDER_LABEL, cx, cy, 2.0)
    {
        text::composite_mask(surface, &mask, PLACEHOLDER_TEXT_COLOR);
    }
}

/// Draw one element: every line stroke-then-fill, with the strike composite
/// on top of the line it belongs to.
fn draw_element(surface: &mut RgbaImage, el: &Element, fonts: &FontStore) {
    let lines = el.lines();
    let line_height = el.line_height();
    let start_y = el.y - (lines.len().saturating_sub(1)) as f32 * line_height / 2.0;

    let stroke_radius = if el.stroke_enabled {
        el.stroke_width.max(2.0) / 2.0
    } else {
        0.0
    };

    for (i, line) in lines.iter().enumerate() {
        let line_y = start_y + i as f32 * line_height;

        if let Some(mask) = text::rasterize_line(
            fonts,
            el.font,
            el.font_size,
            line,
            el.x,
            line_y,
            stroke_radius + 2.0,
        ) {
            if el.stroke_enabled {
                // Stroke sits behind the fill.
                let outline = text::dilate(&mask, stroke_radius);
                text::composite_mask(surface, &outline, el.stroke_color.to_rgba());
            }
            text::composite_mask(surface, &mask, el.fill.to_rgba());
        }

        if el.strikethrough {
            draw_strike(surface, el, line, line_y, fonts);
        }
    }
}

/// Two-pass strike mark: a wide white halo (with a soft shadow underneath)
/// keeps the mark legible over any background, then a narrower red accent
/// goes on top.
fn draw_strike(surface: &mut RgbaImage, el: &Element, line: &str, line_y: f32, fonts: &FontStore) {
    let width = fonts.measure_line(el.font, el.font_size, line);
    let (start, end) = strike_segment(el.x, line_y, width, el.font_size);

    let halo_width = (el.font_size / 5.0).max(8.0);
    let accent_width = (el.font_size / 9.0).max(4.0);

    // Approximation of the original soft drop shadow: one offset translucent
    // pass slightly wider than the halo.
    let shadow_start = (start.0 + STRIKE_SHADOW_OFFSET, start.1 + STRIKE_SHADOW_OFFSET);
    let shadow_end = (end.0 + STRIKE_SHADOW_OFFSET, end.1 + STRIKE_SHADOW_OFFSET);
    raster::draw_segment(
        surface,
        shadow_start,
        shadow_end,
        halo_width + 4.0,
        STRIKE_SHADOW,
        STRIKE_SHADOW_OPACITY,
    );
    raster::draw_segment(surface, start, end, halo_width, STRIKE_HALO, 1.0);
    raster::draw_segment(surface, start, end, accent_width, STRIKE_ACCENT, 1.0);
}
