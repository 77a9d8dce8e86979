use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::Document;
use crate::element::Rgb;

/// The catalog entry for templates without a background of their own.
pub const CUSTOM_TEMPLATE_ID: &str = "custom";

/// Partial element attributes a template may pin down. Unset fields leave
/// the element's current value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub size: Option<f32>,
    pub color: Option<Rgb>,
    pub stroke: Option<bool>,
    pub stroke_color: Option<Rgb>,
    pub stroke_width: Option<f32>,
}

impl ElementPatch {
    fn apply(&self, el: &mut crate::element::Element) {
        if let Some(x) = self.x {
            el.x = x;
        }
        if let Some(y) = self.y {
            el.y = y;
        }
        if let Some(size) = self.size {
            el.font_size = size;
        }
        if let Some(color) = self.color {
            el.fill = color;
        }
        if let Some(stroke) = self.stroke {
            el.stroke_enabled = stroke;
        }
        if let Some(color) = self.stroke_color {
            el.stroke_color = color;
        }
        if let Some(width) = self.stroke_width {
            el.stroke_width = width;
        }
    }
}

/// One static catalog entry. Supplied by the catalog, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub label: String,
    /// Short description shown under the label in the picker.
    #[serde(default)]
    pub desc: String,
    pub width: u32,
    pub height: u32,
    /// Path of the background asset; `None` for the custom template.
    #[serde(default)]
    pub background: Option<String>,
    /// Per-element layout patch, keyed by element id.
    #[serde(default)]
    pub layout: Option<HashMap<String, ElementPatch>>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("template catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("template catalog has no '{CUSTOM_TEMPLATE_ID}' entry")]
    MissingCustom,
}

/// The ordered, read-only template catalog.
#[derive(Debug)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Parse the embedded catalog. Fails loudly at startup rather than
    /// running with a broken picker.
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_json(include_str!("../assets/templates.json"))
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let templates: Vec<Template> = serde_json::from_str(json)?;
        if !templates.iter().any(|t| t.id == CUSTOM_TEMPLATE_ID) {
            return Err(CatalogError::MissingCustom);
        }
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }
}

/// Merge a template's layout patch into the document and adopt the
/// template's declared dimensions. Elements the patch does not list, and
/// attributes a listed patch leaves unset, are untouched. Called after the
/// template's background decoded successfully.
pub fn apply_layout(doc: &mut Document, template: &Template) {
    if let Some(layout) = &template.layout {
        for el in &mut doc.elements {
            if let Some(patch) = layout.get(&el.id) {
                patch.apply(el);
            }
        }
    }
    doc.width = template.width;
    doc.height = template.height;
}

/// Adopt an uploaded background: the document takes the bitmap's natural
/// dimensions and every element is re-centered on the new canvas.
pub fn apply_upload(doc: &mut Document, img_w: u32, img_h: u32) {
    doc.width = img_w.max(1);
    doc.height = img_h.max(1);
    let cx = doc.width as f32 / 2.0;
    let cy = doc.height as f32 / 2.0;
    for el in &mut doc.elements {
        el.x = cx;
        el.y = cy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = TemplateCatalog::load().unwrap();
        let ids: Vec<&str> = catalog.templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a4_land", "a5_land", "shelf", "custom"]);
        let a4 = catalog.get("a4_land").unwrap();
        assert_eq!((a4.width, a4.height), (3508, 2480));
        assert!(a4.background.is_some());
        assert!(a4.layout.as_ref().unwrap().contains_key("p2"));
        let custom = catalog.get("custom").unwrap();
        assert!(custom.background.is_none());
        assert!(custom.layout.is_none());
    }

    #[test]
    fn catalog_without_custom_is_rejected() {
        let json = r#"[{"id":"a","label":"A","width":10,"height":10}]"#;
        assert!(matches!(
            TemplateCatalog::from_json(json),
            Err(CatalogError::MissingCustom)
        ));
    }
}
