use egui::{Pos2, Rect, Vec2};
use tagpress::hit_testing::{self, HIT_PADDING};
use tagpress::{Document, FontStore};

#[test]
fn points_inside_the_padded_box_hit_the_element() {
    let doc = Document::default();
    let fonts = FontStore::empty();
    let el = doc.element("p2").unwrap(); // (540, 650), size 110, "199"

    let bounds = hit_testing::element_bounds(el, &fonts);
    assert!(bounds.contains(Pos2::new(el.x, el.y)));
    // Just inside each padded edge.
    let inside = Pos2::new(bounds.min.x + 1.0, bounds.center().y);
    assert_eq!(hit_testing::hit_test(inside, &doc, &fonts), Some("p2"));
    // Anchor hit.
    assert_eq!(
        hit_testing::hit_test(Pos2::new(540.0, 650.0), &doc, &fonts),
        Some("p2")
    );
}

#[test]
fn points_outside_every_box_miss() {
    let doc = Document::default();
    let fonts = FontStore::empty();
    assert_eq!(hit_testing::hit_test(Pos2::new(5.0, 5.0), &doc, &fonts), None);
    assert_eq!(
        hit_testing::hit_test(Pos2::new(1075.0, 1075.0), &doc, &fonts),
        None
    );
}

#[test]
fn topmost_element_wins_on_overlap() {
    let mut doc = Document::default();
    let fonts = FontStore::empty();
    // Stack a new element exactly on p1's anchor; it is appended last, so
    // it draws on top and must win the hit.
    let id = doc.add_element();
    doc.move_element(&id, 540.0, 500.0);
    assert_eq!(
        hit_testing::hit_test(Pos2::new(540.0, 500.0), &doc, &fonts),
        Some(id.as_str())
    );
}

#[test]
fn padding_expands_the_box_on_every_side() {
    let doc = Document::default();
    let fonts = FontStore::empty();
    let el = doc.element("p1").unwrap();
    let bounds = hit_testing::element_bounds(el, &fonts);
    let text_w = fonts.measure_block(el.font, el.font_size, &el.text);
    let text_h = el.lines().len() as f32 * el.line_height();
    assert_eq!(bounds.width(), text_w + 2.0 * HIT_PADDING);
    assert_eq!(bounds.height(), text_h + 2.0 * HIT_PADDING);
    assert_eq!(bounds.center(), Pos2::new(el.x, el.y));
}

#[test]
fn screen_coordinates_map_through_the_displayed_rect() {
    // 1080x1080 document displayed at half size, offset in the panel.
    let canvas_rect = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(540.0, 540.0));
    let doc_pos = hit_testing::screen_to_doc(Pos2::new(370.0, 320.0), canvas_rect, 1080, 1080);
    assert_eq!(doc_pos, Pos2::new(540.0, 540.0));
    // The mapping is independent of any zoom bookkeeping: only the ratio of
    // backing pixels to displayed pixels matters.
    let corner = hit_testing::screen_to_doc(Pos2::new(100.0, 50.0), canvas_rect, 1080, 1080);
    assert_eq!(corner, Pos2::ZERO);
}
