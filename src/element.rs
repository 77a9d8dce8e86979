use serde::{Deserialize, Serialize};

use crate::fonts::FontFamily;

/// Vertical distance between line centers, as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// An opaque RGB color, serialized as `"#rrggbb"` to match the template
/// catalog format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parse a `#rrggbb` string. Returns `None` for anything else.
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Rgb(r, g, b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgb(self.0, self.1, self.2)
    }

    pub fn from_color32(c: egui::Color32) -> Rgb {
        Rgb(c.r(), c.g(), c.b())
    }

    /// Opaque pixel for the raster pipeline.
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.0, self.1, self.2, 255])
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color string: {s:?}")))
    }
}

/// Element flavor. Only affects which input mask the editor panel uses;
/// rendering is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Price,
}

/// One positioned, styled piece of text drawn onto the document.
///
/// `(x, y)` is the visual center of the whole (possibly multi-line) text
/// block, in document pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    /// Caption shown next to the element's controls in the side panel.
    pub label: String,
    /// Line breaks are literal `\n`.
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub font: FontFamily,
    pub fill: Rgb,
    pub stroke_enabled: bool,
    pub stroke_color: Rgb,
    pub stroke_width: f32,
    pub strikethrough: bool,
    /// Default elements cannot be deleted.
    pub protected: bool,
}

impl Element {
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR
    }
}
