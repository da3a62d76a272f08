//! Error taxonomy shared by sources, the tile pipeline and the catalog.
//!
//! Source-level errors (`OpenFailure`, `MissingGeoreference`,
//! `TransformFailure`) are computed once when a source is opened and stored
//! in the invalid source. Request-level errors are produced per call and are
//! never memoized.

use thiserror::Error;

use crate::coord::TileKey;

/// Errors returned by the tile extraction pipeline and the catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TileError {
    /// The engine could not open the source dataset.
    #[error("Open: {0}")]
    OpenFailure(String),

    /// The dataset has no geotransform or no spatial reference.
    #[error("Image missing georeference({0})")]
    MissingGeoreference(String),

    /// The footprint could not be reprojected to WGS84.
    #[error("Transform - {0}")]
    TransformFailure(String),

    /// The requested tile does not touch the source footprint.
    #[error("Tile {0} outside image")]
    TileOutsideSource(TileKey),

    /// Warp, encode or write failed, or the render timed out.
    #[error("Warp - {0}")]
    RenderFailure(String),

    /// No source is configured under this identifier.
    #[error("Missing image in catalog (key = {0})")]
    UnknownSource(String),
}

/// Coarse classification of a [`TileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OpenFailure,
    MissingGeoreference,
    TransformFailure,
    TileOutsideSource,
    RenderFailure,
    UnknownSource,
}

impl TileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TileError::OpenFailure(_) => ErrorKind::OpenFailure,
            TileError::MissingGeoreference(_) => ErrorKind::MissingGeoreference,
            TileError::TransformFailure(_) => ErrorKind::TransformFailure,
            TileError::TileOutsideSource(_) => ErrorKind::TileOutsideSource,
            TileError::RenderFailure(_) => ErrorKind::RenderFailure,
            TileError::UnknownSource(_) => ErrorKind::UnknownSource,
        }
    }

    /// Human-readable message, as sent to clients.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// True when the request itself was at fault rather than the source or
    /// the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::TileOutsideSource | ErrorKind::UnknownSource
        )
    }

    /// True for errors that permanently invalidate a source.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::OpenFailure | ErrorKind::MissingGeoreference | ErrorKind::TransformFailure
        )
    }
}
