#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod error;
pub mod export;
pub mod library;
pub mod page;
pub mod panels;
pub mod renderer;
pub mod session;
pub mod stroke;
pub mod util;

pub use app::TintbookApp;
pub use canvas::transform::CanvasTransform;
pub use canvas::ColoringCanvas;
pub use error::{ExportError, PageError};
pub use export::ArtworkExporter;
pub use library::Library;
pub use page::{ColoringPage, FillRule, RegionPath, ViewBox};
pub use renderer::Renderer;
pub use session::{Action, ColoringSession, Tool};
pub use stroke::BrushStroke;
