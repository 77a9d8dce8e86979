use std::path::Path;

use eframe::egui;
use image::RgbaImage;

use crate::document::Document;
use crate::export::{self, DownloadSink, FileSink};
use crate::file_handler::FileHandler;
use crate::fonts::FontStore;
use crate::history::HistoryStack;
use crate::loader::{BackgroundLoader, Completion, DecodePurpose, DecodeSource};
use crate::panels;
use crate::renderer;
use crate::template::{self, CUSTOM_TEMPLATE_ID, CatalogError, TemplateCatalog};
use crate::viewport::Viewport;

/// The interactive price-tag editor.
///
/// All user actions funnel through here: input resolved by the hit tester
/// and viewport, a history snapshot taken before each mutation, then the
/// document mutated and the canvas re-rendered.
pub struct TagApp {
    pub(crate) document: Document,
    pub(crate) history: HistoryStack,
    pub(crate) selected: Option<String>,
    pub(crate) viewport: Viewport,
    pub(crate) fonts: FontStore,
    pub(crate) catalog: TemplateCatalog,
    pub(crate) active_template: String,
    pub(crate) background: Option<RgbaImage>,
    pub(crate) loader: BackgroundLoader,
    pub(crate) file_handler: FileHandler,
    pub(crate) status: Option<String>,
    /// Live touch points by id, for pinch recognition.
    pub(crate) touches: std::collections::HashMap<u64, egui::Pos2>,

    /// Bumped on any change that affects the rendered canvas.
    revision: u64,
    texture: Option<(u64, egui::TextureHandle)>,
    /// Refit the viewport on the next frame (document dimensions changed).
    pub(crate) needs_fit: bool,
    last_panel_size: egui::Vec2,
}

impl TagApp {
    /// Called once before the first frame. Fonts are registered here and
    /// treated as immutable for the rest of the session.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Result<Self, CatalogError> {
        let catalog = TemplateCatalog::load()?;
        let fonts = FontStore::load_from_dir(Path::new("assets/fonts"));
        Ok(Self {
            document: Document::default(),
            history: HistoryStack::new(),
            selected: None,
            viewport: Viewport::default(),
            fonts,
            catalog,
            active_template: CUSTOM_TEMPLATE_ID.to_owned(),
            background: None,
            loader: BackgroundLoader::new(),
            file_handler: FileHandler::new(),
            status: None,
            touches: std::collections::HashMap::new(),
            revision: 0,
            texture: None,
            needs_fit: true,
            last_panel_size: egui::Vec2::ZERO,
        })
    }

    /// Anything that changes rendered pixels calls this.
    pub(crate) fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    /// Snapshot the current document before a mutation.
    pub(crate) fn snapshot(&mut self) {
        self.history.record(&self.document);
    }

    pub(crate) fn undo(&mut self) {
        let dims = (self.document.width, self.document.height);
        if self.history.undo(&mut self.document) {
            self.selected = None;
            // Refit only when the restored state has other canvas
            // dimensions; plain element edits keep the user's zoom and pan.
            if (self.document.width, self.document.height) != dims {
                self.needs_fit = true;
            }
            self.mark_dirty();
        }
    }

    pub(crate) fn redo(&mut self) {
        let dims = (self.document.width, self.document.height);
        if self.history.redo(&mut self.document) {
            self.selected = None;
            if (self.document.width, self.document.height) != dims {
                self.needs_fit = true;
            }
            self.mark_dirty();
        }
    }

    pub(crate) fn add_element(&mut self) {
        self.snapshot();
        let id = self.document.add_element();
        self.selected = Some(id);
        self.mark_dirty();
    }

    pub(crate) fn delete_element(&mut self, id: &str) {
        // Protected elements make this a valid no-op; only real removals
        // consume a history slot.
        let deletable = self
            .document
            .element(id)
            .is_some_and(|el| !el.protected);
        if !deletable {
            return;
        }
        self.snapshot();
        self.document.remove_element(id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.mark_dirty();
    }

    /// Template picker entry point. `custom` drops the background
    /// immediately; named templates kick off an async background decode and
    /// apply their layout only once it succeeds.
    pub(crate) fn select_template(&mut self, id: &str) {
        self.active_template = id.to_owned();
        if id == CUSTOM_TEMPLATE_ID {
            self.background = None;
            self.mark_dirty();
            return;
        }
        if let Some(tpl) = self.catalog.get(id) {
            if let Some(bg) = &tpl.background {
                self.loader.request(
                    DecodeSource::Path(bg.into()),
                    DecodePurpose::Template(id.to_owned()),
                );
            }
        }
    }

    pub(crate) fn request_upload(&mut self, source: DecodeSource) {
        self.loader.request(source, DecodePurpose::Upload);
    }

    /// Apply the latest decode completion, if any. Failures leave every
    /// piece of state exactly as it was; the snapshot is taken only here,
    /// right before the state replacement, so a failed decode never
    /// consumes a history slot.
    fn poll_decodes(&mut self) {
        let Some(Completion {
            purpose, result, ..
        }) = self.loader.poll()
        else {
            return;
        };
        let img = match result {
            Ok(img) => img,
            Err(err) => {
                log::warn!("background decode failed: {err}");
                return;
            }
        };
        match purpose {
            DecodePurpose::Template(id) => {
                if let Some(tpl) = self.catalog.get(&id).cloned() {
                    self.snapshot();
                    template::apply_layout(&mut self.document, &tpl);
                    self.background = Some(img);
                    self.needs_fit = true;
                    self.mark_dirty();
                }
            }
            DecodePurpose::Upload => {
                self.snapshot();
                if self.active_template == CUSTOM_TEMPLATE_ID {
                    template::apply_upload(&mut self.document, img.width(), img.height());
                }
                self.background = Some(img);
                self.needs_fit = true;
                self.mark_dirty();
            }
        }
    }

    pub(crate) fn export(&mut self) {
        let result = export::export_png(
            &self.document,
            self.background.as_ref(),
            &self.fonts,
            &self.active_template,
        )
        .and_then(|artifact| {
            let sink = FileSink::default();
            sink.deliver(&artifact)?;
            Ok(artifact.filename)
        });
        self.status = Some(match result {
            Ok(filename) => format!("✔ {filename}"),
            Err(err) => {
                log::error!("export failed: {err}");
                format!("✘ {err}")
            }
        });
    }

    /// Refit the viewport when the document dimensions changed or the
    /// canvas container was resized.
    pub(crate) fn maybe_fit(&mut self, panel_size: egui::Vec2) {
        if self.needs_fit || panel_size != self.last_panel_size {
            self.viewport
                .fit_to_container(panel_size, self.document.width, self.document.height);
            self.needs_fit = false;
            self.last_panel_size = panel_size;
        }
    }

    /// The element that gets the dashed overlay: the one being dragged, or
    /// the selected one.
    fn highlight(&self) -> Option<&str> {
        self.viewport
            .dragged_id()
            .or(self.selected.as_deref())
    }

    /// Re-render the canvas raster only when something changed.
    pub(crate) fn canvas_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        if let Some((revision, texture)) = &self.texture {
            if *revision == self.revision {
                return texture.id();
            }
        }
        let raster = renderer::render_document(
            &self.document,
            self.background.as_ref(),
            self.highlight(),
            false,
            &self.fonts,
        );
        let size = [raster.width() as usize, raster.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, raster.as_raw());
        let texture = ctx.load_texture("canvas", color_image, egui::TextureOptions::LINEAR);
        let id = texture.id();
        self.texture = Some((self.revision, texture));
        id
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let undo = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
        let redo = egui::KeyboardShortcut::new(
            egui::Modifiers::COMMAND | egui::Modifiers::SHIFT,
            egui::Key::Z,
        );
        // Check redo first: it is the stricter modifier combination.
        if ctx.input_mut(|i| i.consume_shortcut(&redo)) {
            self.redo();
        } else if ctx.input_mut(|i| i.consume_shortcut(&undo)) {
            self.undo();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
            if let Some(id) = self.selected.clone() {
                self.delete_element(&id);
            }
        }
    }
}

impl eframe::App for TagApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_decodes();

        if self.file_handler.check_for_dropped_files(ctx) {
            if self.active_template == CUSTOM_TEMPLATE_ID {
                // Several drops at once: the last one wins, like repeated uploads.
                if let Some(source) = self.file_handler.take_upload_sources().pop() {
                    self.request_upload(source);
                }
            } else {
                self.file_handler.take_upload_sources();
                log::info!("ignoring dropped image: uploads apply to the custom template");
            }
        }

        self.handle_shortcuts(ctx);

        panels::controls_panel(self, ctx);
        panels::canvas_panel(self, ctx);

        if self.loader.pending() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> TagApp {
        TagApp {
            document: Document::default(),
            history: HistoryStack::new(),
            selected: None,
            viewport: Viewport::default(),
            fonts: FontStore::empty(),
            catalog: TemplateCatalog::load().unwrap(),
            active_template: CUSTOM_TEMPLATE_ID.to_owned(),
            background: None,
            loader: BackgroundLoader::new(),
            file_handler: FileHandler::new(),
            status: None,
            touches: std::collections::HashMap::new(),
            revision: 0,
            texture: None,
            needs_fit: false,
            last_panel_size: egui::Vec2::ZERO,
        }
    }

    #[test]
    fn undoing_a_move_keeps_the_viewport() {
        let mut app = app();
        app.snapshot();
        app.document.move_element("t1", 600.0, 350.0);
        app.undo();
        assert_eq!(app.document.element("t1").unwrap().x, 540.0);
        assert!(!app.needs_fit);
    }

    #[test]
    fn undo_and_redo_refit_when_canvas_dimensions_change() {
        let mut app = app();
        app.snapshot();
        template::apply_upload(&mut app.document, 800, 600);
        app.undo();
        assert_eq!((app.document.width, app.document.height), (1080, 1080));
        assert!(app.needs_fit);

        app.needs_fit = false;
        app.redo();
        assert_eq!((app.document.width, app.document.height), (800, 600));
        assert!(app.needs_fit);
    }
}
