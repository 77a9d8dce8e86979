//! End-to-end editing flows over the document, history, and compositor,
//! exercised the way the app's event handlers drive them.

use tagpress::history::HistoryStack;
use tagpress::{Document, FontStore};

/// Add a new element, undo it, redo it; the redone element is identical.
#[test]
fn add_element_undo_redo() {
    let mut doc = Document::default();
    let mut history = HistoryStack::new();
    assert_eq!(doc.elements.len(), 3);

    history.record(&doc);
    let id = doc.add_element();
    assert_eq!(doc.elements.len(), 4);

    let added = doc.element(&id).unwrap().clone();
    assert_eq!(added.text, "جديد");
    assert_eq!(added.font_size, 108.0); // round(min(1080, 1080) * 0.1)
    assert_eq!((added.x, added.y), (540.0, 540.0));
    assert!(!added.protected);

    assert!(history.undo(&mut doc));
    assert_eq!(doc.elements.len(), 3);
    assert!(doc.element(&id).is_none());

    assert!(history.redo(&mut doc));
    assert_eq!(doc.elements.len(), 4);
    assert_eq!(doc.element(&id).unwrap(), &added);
}

/// Dragging by a pointer delta moves the anchor by the same document-space
/// delta when no clamping triggers.
#[test]
fn drag_moves_anchor_by_pointer_delta() {
    let mut doc = Document::default();
    let el = doc.element("t1").unwrap();
    assert_eq!((el.x, el.y), (540.0, 300.0));

    // The canvas panel computes target = pointer_doc_pos - grab_offset;
    // with the grab at the anchor this reduces to anchor + delta.
    let (dx, dy) = (50.0, -20.0);
    assert!(doc.move_element("t1", 540.0 + dx, 300.0 + dy));
    let el = doc.element("t1").unwrap();
    assert_eq!((el.x, el.y), (590.0, 280.0));
}

/// Out-of-range drags clamp silently instead of being rejected.
#[test]
fn drag_outside_canvas_clamps() {
    let mut doc = Document::default();
    assert!(doc.move_element("p2", 5000.0, -40.0));
    let el = doc.element("p2").unwrap();
    assert_eq!((el.x, el.y), (1080.0, 0.0));
}

/// A full flow: template-free render before and after an edit + undo ends
/// at identical pixels to the untouched document.
#[test]
fn undone_edit_renders_identically_to_the_original() {
    let fonts = FontStore::empty();
    let mut doc = Document::default();
    let mut history = HistoryStack::new();

    let baseline = tagpress::renderer::render_document(&doc, None, None, false, &fonts);

    history.record(&doc);
    doc.add_element();
    history.record(&doc);
    doc.move_element("p1", 100.0, 100.0);

    assert!(history.undo(&mut doc));
    assert!(history.undo(&mut doc));

    let restored = tagpress::renderer::render_document(&doc, None, None, false, &fonts);
    assert_eq!(baseline.as_raw(), restored.as_raw());
}

/// Deleting a protected element is an idempotent no-op and must not eat a
/// history slot when driven the way the app does it.
#[test]
fn protected_delete_leaves_history_untouched() {
    let mut doc = Document::default();
    let mut history = HistoryStack::new();

    // App-level guard: only snapshot when the delete will happen.
    let deletable = doc.element("p1").is_some_and(|el| !el.protected);
    if deletable {
        history.record(&doc);
        doc.remove_element("p1");
    }
    assert_eq!(doc.elements.len(), 3);
    assert!(!history.can_undo());
}
