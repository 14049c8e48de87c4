//! Error types for style-forge operations.

use thiserror::Error;

/// Errors surfaced by the pipeline and the PDF exporter.
///
/// Deduplication, CSS minification and HTML serialization never fail; only
/// the I/O edges and the renderer do.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
