use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use serde::{Deserialize, Serialize};

/// The fixed set of families the compositor knows about. Font files
/// themselves are an external concern; see [`FontStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    Cairo,
    Tajawal,
    Almarai,
    Arial,
}

impl FontFamily {
    pub const ALL: [FontFamily; 4] = [
        FontFamily::Cairo,
        FontFamily::Tajawal,
        FontFamily::Almarai,
        FontFamily::Arial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FontFamily::Cairo => "Cairo",
            FontFamily::Tajawal => "Tajawal",
            FontFamily::Almarai => "Almarai",
            FontFamily::Arial => "Arial",
        }
    }

    /// Label shown in the font picker.
    pub fn label(self) -> &'static str {
        match self {
            FontFamily::Cairo => "Cairo (عربي عصري)",
            FontFamily::Tajawal => "Tajawal (عربي رسمي)",
            FontFamily::Almarai => "Almarai (عربي واضح)",
            FontFamily::Arial => "Arial (قياسي)",
        }
    }
}

/// Advance per character, in em, used when a family has no loaded font.
/// Keeps measurement (and with it hit testing and strike geometry)
/// deterministic on machines without the font assets.
const FALLBACK_ADVANCE_EM: f32 = 0.6;

/// Registered fonts for the four supported families.
///
/// Built once at startup and treated as immutable afterwards. Families whose
/// TTF is missing fall back to heuristic metrics and render no glyphs; the
/// rest of the pipeline (layout, bounds, strike marks) is unaffected.
pub struct FontStore {
    fonts: HashMap<FontFamily, FontArc>,
}

impl FontStore {
    /// A store with no loaded fonts; every family uses fallback metrics.
    pub fn empty() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    /// Load `<dir>/<Family>.ttf` for each family. Missing or unparsable
    /// files are logged and skipped.
    pub fn load_from_dir(dir: &Path) -> Self {
        let mut fonts = HashMap::new();
        for family in FontFamily::ALL {
            let path = dir.join(format!("{}.ttf", family.as_str()));
            match std::fs::read(&path) {
                Ok(bytes) => match FontArc::try_from_vec(bytes) {
                    Ok(font) => {
                        log::info!("loaded font {} from {}", family.as_str(), path.display());
                        fonts.insert(family, font);
                    }
                    Err(err) => {
                        log::warn!("font {} is not a valid TTF: {err}", path.display());
                    }
                },
                Err(_) => {
                    log::warn!(
                        "font {} not found at {}; using fallback metrics",
                        family.as_str(),
                        path.display()
                    );
                }
            }
        }
        Self { fonts }
    }

    pub fn get(&self, family: FontFamily) -> Option<&FontArc> {
        self.fonts.get(&family)
    }

    /// Measured width of a single line at the given pixel size. Uses kerned
    /// glyph advances when the family is loaded, fallback metrics otherwise.
    pub fn measure_line(&self, family: FontFamily, size: f32, line: &str) -> f32 {
        match self.fonts.get(&family) {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                let mut width = 0.0f32;
                let mut prev = None;
                for ch in line.chars() {
                    let id = font.glyph_id(ch);
                    if let Some(prev) = prev {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
            None => line.chars().count() as f32 * size * FALLBACK_ADVANCE_EM,
        }
    }

    /// Widest line of a multi-line block.
    pub fn measure_block(&self, family: FontFamily, size: f32, text: &str) -> f32 {
        text.split('\n')
            .map(|line| self.measure_line(family, size, line))
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_metrics_are_deterministic() {
        let store = FontStore::empty();
        let w = store.measure_line(FontFamily::Cairo, 100.0, "199");
        assert!((w - 3.0 * 100.0 * FALLBACK_ADVANCE_EM).abs() < 1e-4);
        assert_eq!(w, store.measure_line(FontFamily::Cairo, 100.0, "199"));
    }

    #[test]
    fn block_width_takes_widest_line() {
        let store = FontStore::empty();
        let block = store.measure_block(FontFamily::Arial, 50.0, "ab\nabcd\nc");
        let widest = store.measure_line(FontFamily::Arial, 50.0, "abcd");
        assert_eq!(block, widest);
    }

    #[test]
    fn empty_line_measures_zero() {
        let store = FontStore::empty();
        assert_eq!(store.measure_line(FontFamily::Cairo, 80.0, ""), 0.0);
    }
}
