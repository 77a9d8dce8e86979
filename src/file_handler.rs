use eframe::egui;

use crate::loader::DecodeSource;

/// Watches the egui context for dropped files and turns image drops into
/// background upload sources. Non-image drops are logged and skipped.
#[derive(Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect any newly dropped files from this frame's input. Returns true
    /// if there is something to process.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
            }
        });
        !self.dropped_files.is_empty()
    }

    /// Drain the queue into decode sources, keeping only image files.
    pub fn take_upload_sources(&mut self) -> Vec<DecodeSource> {
        let mut sources = Vec::new();
        for file in self.dropped_files.drain(..) {
            let name = display_name(&file);
            if !is_image_file(&file) {
                log::warn!("dropped file is not a supported image: {name}");
                continue;
            }
            if let Some(bytes) = &file.bytes {
                log::info!("upload from memory: {name} ({} bytes)", bytes.len());
                sources.push(DecodeSource::Bytes(bytes.to_vec()));
            } else if let Some(path) = &file.path {
                log::info!("upload from path: {}", path.display());
                sources.push(DecodeSource::Path(path.clone()));
            } else {
                log::warn!("dropped file {name} has neither bytes nor a path");
            }
        }
        sources
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Image check by MIME type when present, extension otherwise.
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    if let Some(ext) = file.path.as_ref().and_then(|p| p.extension()) {
        let ext = ext.to_string_lossy().to_lowercase();
        return matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp");
    }
    false
}
