//! Raster sources: one opened dataset plus its WGS84 footprint.

mod footprint;
mod raster;

pub use footprint::SourceFootprint;
pub use raster::{RasterSource, SourceStatus};
