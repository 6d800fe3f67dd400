//! Error types for the voxel mesher.

use thiserror::Error;

/// Result type alias using MesherError.
pub type Result<T> = std::result::Result<T, MesherError>;

/// Main error type for grid loading, atlas decoding and export.
#[derive(Error, Debug)]
pub enum MesherError {
    /// Failed to parse JSON data (configs, manifests).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A grid snapshot does not match the configured grid shape.
    #[error("Grid snapshot is {actual} bytes, expected {expected} bytes for this grid shape")]
    SnapshotSize { expected: usize, actual: usize },

    /// Grid shape or cell data is unusable.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Texture atlas pixel data is unusable.
    #[error("Atlas error: {0}")]
    Atlas(String),

    /// Texture group ranges do not tile the quad buffer.
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    /// Failed to export mesh.
    #[error("Export error: {0}")]
    Export(String),
}
