//! Raster engine capability.
//!
//! Everything that touches pixels goes through [`RasterEngine`]: opening a
//! dataset, reading its georeference, reprojecting coordinates, warping into
//! a tile and encoding the result. The tile pipeline only depends on this
//! trait, so tests substitute a counting fake and production uses
//! [`ImageEngine`].

mod error;
mod image_engine;
mod transform;
mod types;
mod worldfile;

#[cfg(test)]
pub(crate) mod fake;

pub use error::EngineError;
pub use image_engine::{ImageDataset, ImageEngine};
pub use transform::{transform_points, Reprojection};
pub use types::{GeoTransform, ResampleKind, TileFormat, WarpOptions};
pub use worldfile::{parse_world_file, world_file_candidates};

use std::path::Path;

use crate::geometry::{Crs, Point};

/// An opened raster dataset.
pub trait Dataset: Send + Sync {
    /// Affine georeference; [`GeoTransform::IDENTITY`] when absent.
    fn geo_transform(&self) -> GeoTransform;

    /// Spatial reference definition; empty when absent.
    fn spatial_ref(&self) -> &str;

    /// Raster size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);
}

/// Trait for raster engines.
///
/// Implementations must be thread-safe (`Send + Sync`): a single engine is
/// shared by every source of a catalog and its methods are called from the
/// blocking thread pool. All methods are synchronous.
pub trait RasterEngine: Send + Sync + 'static {
    type Dataset: Dataset + 'static;

    /// Open a dataset read-only.
    fn open(&self, path: &Path) -> Result<Self::Dataset, EngineError>;

    /// Reproject points from `src` to `dst`.
    fn transform_points(&self, points: &[Point], src: &Crs, dst: &Crs)
        -> Result<Vec<Point>, EngineError>;

    /// Resample `dataset` into a new in-memory dataset.
    fn warp(&self, dataset: &Self::Dataset, options: &WarpOptions)
        -> Result<Self::Dataset, EngineError>;

    /// Encode a dataset to bytes.
    fn encode(&self, dataset: &Self::Dataset, format: TileFormat) -> Result<Vec<u8>, EngineError>;

    /// Write a dataset to a named file.
    fn write(
        &self,
        dataset: &Self::Dataset,
        format: TileFormat,
        path: &Path,
    ) -> Result<(), EngineError> {
        let data = self.encode(dataset, format)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
