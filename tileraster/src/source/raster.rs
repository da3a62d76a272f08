//! Raster source handle.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use super::SourceFootprint;
use crate::engine::RasterEngine;
use crate::error::TileError;

/// Whether a source can serve tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Ready,
    Invalid,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Ready => write!(f, "ready"),
            SourceStatus::Invalid => write!(f, "invalid"),
        }
    }
}

enum SourceState<D> {
    Ready { dataset: D, footprint: SourceFootprint },
    Invalid(TileError),
}

/// One opened raster dataset and its footprint.
///
/// Opening never fails as such: a source whose dataset cannot be opened or
/// georeferenced becomes permanently `Invalid` and keeps the error, so every
/// later request fails fast without touching the engine again. The dataset is
/// owned by the handle and dropped with it.
pub struct RasterSource<D> {
    id: String,
    path: PathBuf,
    state: SourceState<D>,
}

impl<D> RasterSource<D> {
    /// Open `path` with `engine` and compute its footprint.
    pub fn open<E>(engine: &E, id: impl Into<String>, path: impl Into<PathBuf>) -> Self
    where
        E: RasterEngine<Dataset = D>,
    {
        let id = id.into();
        let path = path.into();
        let start = Instant::now();

        let state = match engine.open(&path) {
            Err(e) => SourceState::Invalid(TileError::OpenFailure(e.to_string())),
            Ok(dataset) => match SourceFootprint::from_dataset(engine, &dataset) {
                Ok(footprint) => SourceState::Ready { dataset, footprint },
                Err(e) => SourceState::Invalid(e),
            },
        };

        let source = Self { id, path, state };
        debug!(
            source = %source.id,
            path = %source.path.display(),
            status = %source.status(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Opened source"
        );
        source
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> SourceStatus {
        match self.state {
            SourceState::Ready { .. } => SourceStatus::Ready,
            SourceState::Invalid(_) => SourceStatus::Invalid,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == SourceStatus::Ready
    }

    /// The stored error of an invalid source.
    pub fn error(&self) -> Option<&TileError> {
        match &self.state {
            SourceState::Invalid(e) => Some(e),
            SourceState::Ready { .. } => None,
        }
    }

    pub fn footprint(&self) -> Option<&SourceFootprint> {
        match &self.state {
            SourceState::Ready { footprint, .. } => Some(footprint),
            SourceState::Invalid(_) => None,
        }
    }

    /// Dataset and footprint of a ready source, or the stored error.
    pub fn ready(&self) -> Result<(&D, &SourceFootprint), TileError> {
        match &self.state {
            SourceState::Ready { dataset, footprint } => Ok((dataset, footprint)),
            SourceState::Invalid(e) => Err(e.clone()),
        }
    }
}

impl<D> fmt::Debug for RasterSource<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSource")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("status", &self.status())
            .field("error", &self.error())
            .finish()
    }
}
