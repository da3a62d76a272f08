//! Error type for raster engine operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a [`RasterEngine`](super::RasterEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The dataset could not be opened or decoded.
    #[error("{path}: {message}")]
    Open { path: PathBuf, message: String },

    /// A georeference sidecar exists but could not be parsed.
    #[error("invalid georeference: {0}")]
    Georeference(String),

    /// Coordinate transformation failed.
    #[error("{0}")]
    Transform(String),

    /// Warping failed.
    #[error("{0}")]
    Warp(String),

    /// Encoding to the output format failed.
    #[error("encode: {0}")]
    Encode(String),

    /// Unsupported format, resampling or CRS.
    #[error("unsupported {0}")]
    Unsupported(String),

    /// I/O error while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
