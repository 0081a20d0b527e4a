use thiserror::Error;

/// Errors that can occur while constructing a coloring page
#[derive(Error, Debug)]
pub enum PageError {
    #[error("invalid viewBox {value:?}: {reason}")]
    InvalidViewBox { value: String, reason: String },
    #[error("invalid path data for region {region:?}: {reason}")]
    InvalidPathData { region: String, reason: String },
}

/// Errors that can occur while exporting the colored canvas to a file
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("the captured frame does not cover the canvas")]
    EmptyCapture,
    #[error("failed to encode png: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}
