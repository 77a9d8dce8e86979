use egui::{Pos2, Rect, Vec2};

use crate::document::Document;
use crate::element::Element;
use crate::fonts::FontStore;

/// Grab slack around every element, in document pixels on each side.
pub const HIT_PADDING: f32 = 40.0;
/// Nominal box width for an element whose every line is empty.
pub const EMPTY_TEXT_WIDTH: f32 = 50.0;

/// Map a screen point into document pixel space using the ratio between the
/// raster's backing size and the rect it is displayed in. This stays correct
/// under any device pixel scaling, independent of the zoom factor.
pub fn screen_to_doc(screen: Pos2, canvas_rect: Rect, doc_w: u32, doc_h: u32) -> Pos2 {
    let scale_x = doc_w as f32 / canvas_rect.width();
    let scale_y = doc_h as f32 / canvas_rect.height();
    Pos2::new(
        (screen.x - canvas_rect.min.x) * scale_x,
        (screen.y - canvas_rect.min.y) * scale_y,
    )
}

/// Padded bounding box of an element, centered on its anchor: widest
/// measured line by stacked line height, expanded by [`HIT_PADDING`] on
/// every side.
pub fn element_bounds(el: &Element, fonts: &FontStore) -> Rect {
    let max_width = fonts.measure_block(el.font, el.font_size, &el.text);
    let w = if max_width > 0.0 {
        max_width
    } else {
        EMPTY_TEXT_WIDTH
    };
    let line_count = el.lines().len();
    let stacked = line_count as f32 * el.line_height();
    let h = if stacked > 0.0 { stacked } else { el.font_size };
    Rect::from_center_size(
        Pos2::new(el.x, el.y),
        Vec2::new(w + 2.0 * HIT_PADDING, h + 2.0 * HIT_PADDING),
    )
}

/// Topmost element whose padded box contains the point, or `None` (the
/// caller then treats the gesture as a pan). Elements are tested in reverse
/// z-order so overlaps resolve to the element drawn on top.
pub fn hit_test<'doc>(doc_pos: Pos2, doc: &'doc Document, fonts: &FontStore) -> Option<&'doc str> {
    doc.elements
        .iter()
        .rev()
        .find(|el| element_bounds(el, fonts).contains(doc_pos))
        .map(|el| el.id.as_str())
}
