use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind, Rgb};
use crate::fonts::FontFamily;
use crate::id_generator;

/// Default placeholder strings that are cleared on first focus.
pub const PLACEHOLDER_TEXTS: [&str; 4] = [" 💚🤍 أبو علي 🫡", "250", "199", "جديد"];

/// The canonical editing state: canvas dimensions plus the z-ordered list of
/// elements. Vec order is draw order; later elements draw on top. This is the
/// unit of undo/redo, so it stays a plain value type that can be deep-copied
/// with `clone()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub width: u32,
    pub height: u32,
    pub elements: Vec<Element>,
}

impl Default for Document {
    /// The session starts with a hard-coded 1080x1080 tag: product name,
    /// struck old price, highlighted new price. All three are protected.
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
            elements: vec![
                Element {
                    id: "t1".into(),
                    kind: ElementKind::Text,
                    label: "اسم المنتج".into(),
                    text: " 💚🤍 أبو علي 🫡".into(),
                    x: 540.0,
                    y: 300.0,
                    font_size: 80.0,
                    font: FontFamily::Cairo,
                    fill: Rgb(0x33, 0x33, 0x33),
                    stroke_enabled: false,
                    stroke_color: Rgb::BLACK,
                    stroke_width: 4.0,
                    strikethrough: false,
                    protected: true,
                },
                Element {
                    id: "p1".into(),
                    kind: ElementKind::Price,
                    label: "السعر القديم".into(),
                    text: "250".into(),
                    x: 540.0,
                    y: 500.0,
                    font_size: 60.0,
                    font: FontFamily::Cairo,
                    fill: Rgb::WHITE,
                    stroke_enabled: true,
                    stroke_color: Rgb::BLACK,
                    stroke_width: 4.0,
                    strikethrough: true,
                    protected: true,
                },
                Element {
                    id: "p2".into(),
                    kind: ElementKind::Price,
                    label: "السعر الجديد".into(),
                    text: "199".into(),
                    x: 540.0,
                    y: 650.0,
                    font_size: 110.0,
                    font: FontFamily::Cairo,
                    fill: Rgb(0xfe, 0xfb, 0x41),
                    stroke_enabled: true,
                    stroke_color: Rgb::BLACK,
                    stroke_width: 6.0,
                    strikethrough: false,
                    protected: true,
                },
            ],
        }
    }
}

impl Document {
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    /// Append a new text element at the canvas center, sized relative to the
    /// smaller canvas dimension. Returns the new element's id.
    pub fn add_element(&mut self) -> String {
        let id = id_generator::generate_id();
        let base = self.width.min(self.height) as f32;
        self.elements.push(Element {
            id: id.clone(),
            kind: ElementKind::Text,
            label: "نص إضافي".into(),
            text: "جديد".into(),
            x: self.width as f32 / 2.0,
            y: self.height as f32 / 2.0,
            font_size: (base * 0.1).round(),
            font: FontFamily::Cairo,
            fill: Rgb::WHITE,
            stroke_enabled: true,
            stroke_color: Rgb::BLACK,
            stroke_width: 4.0,
            strikethrough: false,
            protected: false,
        });
        id
    }

    /// Remove an element by id. Protected elements stay put; the request is
    /// a valid no-op, not an error.
    pub fn remove_element(&mut self, id: &str) -> bool {
        let deletable = self.element(id).is_some_and(|el| !el.protected);
        if deletable {
            self.elements.retain(|el| el.id != id);
        }
        deletable
    }

    /// Move an element's anchor, clamping it to the canvas. The clamp bounds
    /// the anchor point only, so part of a large element may sit outside the
    /// visible canvas.
    pub fn move_element(&mut self, id: &str, x: f32, y: f32) -> bool {
        let (w, h) = (self.width as f32, self.height as f32);
        if let Some(el) = self.element_mut(id) {
            el.x = x.clamp(0.0, w);
            el.y = y.clamp(0.0, h);
            true
        } else {
            false
        }
    }

    /// The side panel's "center" button: snap the anchor back to the
    /// horizontal middle of the canvas.
    pub fn center_horizontally(&mut self, id: &str) -> bool {
        let center = self.width as f32 / 2.0;
        if let Some(el) = self.element_mut(id) {
            el.x = center;
            true
        } else {
            false
        }
    }

    /// Whether the element still shows untouched placeholder text. The panel
    /// clears such text on first focus (after snapshotting history).
    pub fn has_placeholder_text(&self, id: &str) -> bool {
        self.element(id)
            .is_some_and(|el| PLACEHOLDER_TEXTS.contains(&el.text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_shape() {
        let doc = Document::default();
        assert_eq!((doc.width, doc.height), (1080, 1080));
        assert_eq!(doc.elements.len(), 3);
        assert!(doc.elements.iter().all(|el| el.protected));
        let ids: Vec<&str> = doc.elements.iter().map(|el| el.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "p1", "p2"]);
    }

    #[test]
    fn protected_elements_survive_delete() {
        let mut doc = Document::default();
        assert!(!doc.remove_element("t1"));
        assert_eq!(doc.elements.len(), 3);
    }

    #[test]
    fn delete_unprotected_element() {
        let mut doc = Document::default();
        let id = doc.add_element();
        assert_eq!(doc.elements.len(), 4);
        assert!(doc.remove_element(&id));
        assert_eq!(doc.elements.len(), 3);
        // Deleting again is a no-op.
        assert!(!doc.remove_element(&id));
    }

    #[test]
    fn move_clamps_anchor_to_canvas() {
        let mut doc = Document::default();
        assert!(doc.move_element("t1", -50.0, 2000.0));
        let el = doc.element("t1").unwrap();
        assert_eq!((el.x, el.y), (0.0, 1080.0));
    }

    #[test]
    fn center_horizontally_snaps_x() {
        let mut doc = Document::default();
        doc.move_element("p1", 100.0, 400.0);
        assert!(doc.center_horizontally("p1"));
        assert_eq!(doc.element("p1").unwrap().x, 540.0);
    }
}
