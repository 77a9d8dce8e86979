#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod document;
pub mod element;
pub mod export;
pub mod file_handler;
pub mod fonts;
pub mod history;
pub mod hit_testing;
pub mod id_generator;
pub mod loader;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod template;
pub mod text;
pub mod util;
pub mod viewport;

pub use app::TagApp;
pub use document::Document;
pub use element::{Element, ElementKind, Rgb};
pub use fonts::{FontFamily, FontStore};
pub use history::HistoryStack;
pub use template::{Template, TemplateCatalog};
pub use viewport::{InteractionMode, Viewport};
