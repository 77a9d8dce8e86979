use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use thiserror::Error;

use crate::document::Document;
use crate::fonts::FontStore;
use crate::renderer;
use crate::util::time;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("could not deliver {filename}: {source}")]
    Deliver {
        filename: String,
        source: std::io::Error,
    },
}

/// A finished export: encoded bytes plus the name they should be saved as.
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `price-tag-<templateId>-<unixMillis>.png`
pub fn export_filename(template_id: &str, timestamp_millis: u64) -> String {
    format!("price-tag-{template_id}-{timestamp_millis}.png")
}

/// Render the document in export mode (no selection overlay) and encode it
/// losslessly. Encode failures are surfaced, not swallowed.
pub fn export_png(
    doc: &Document,
    background: Option<&RgbaImage>,
    fonts: &FontStore,
    template_id: &str,
) -> Result<ExportArtifact, ExportError> {
    let raster = renderer::render_document(doc, background, None, true, fonts);
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(raster).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(ExportArtifact {
        filename: export_filename(template_id, time::timestamp_millis()),
        bytes,
    })
}

/// The "trigger download of bytes" collaborator. The core produces the
/// artifact; delivering it to the user is someone else's job.
pub trait DownloadSink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<(), ExportError>;
}

/// Native sink: write the artifact into a directory.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, artifact: &ExportArtifact) -> PathBuf {
        self.dir.join(&artifact.filename)
    }
}

impl DownloadSink for FileSink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<(), ExportError> {
        let path = self.path_for(artifact);
        std::fs::write(&path, &artifact.bytes).map_err(|source| ExportError::Deliver {
            filename: artifact.filename.clone(),
            source,
        })?;
        log::info!("exported {}", path.display());
        Ok(())
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_pattern() {
        assert_eq!(
            export_filename("a4_land", 1700000000123),
            "price-tag-a4_land-1700000000123.png"
        );
    }

    #[test]
    fn export_encodes_a_decodable_png() {
        let mut doc = Document::default();
        doc.width = 40;
        doc.height = 30;
        let fonts = FontStore::empty();
        let artifact = export_png(&doc, None, &fonts, "custom").unwrap();
        assert!(artifact.filename.starts_with("price-tag-custom-"));
        let decoded = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!(decoded.width(), 40);
        assert_eq!(decoded.height(), 30);
    }
}
