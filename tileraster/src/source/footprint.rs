//! Source footprint construction.

use crate::coord::TileKey;
use crate::engine::{Dataset, RasterEngine};
use crate::error::TileError;
use crate::geometry::{intersects, Crs, GeoBox, Point, Polygon};

/// Valid extent of one source, as a polygon in WGS84.
///
/// Built once per opened dataset from the four corners of its affine
/// geotransform (rotation terms included), reprojected from the native CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFootprint {
    polygon: Polygon,
    bounds: GeoBox,
}

impl SourceFootprint {
    /// Compute the footprint of an opened dataset.
    ///
    /// # Errors
    ///
    /// - `MissingGeoreference("geotransform")` for the identity geotransform
    /// - `MissingGeoreference("projection")` for an absent spatial reference
    /// - `TransformFailure` when the corners cannot be reprojected
    pub fn from_dataset<E: RasterEngine>(engine: &E, dataset: &E::Dataset) -> Result<Self, TileError> {
        let geo_transform = dataset.geo_transform();
        if geo_transform.is_identity() {
            return Err(TileError::MissingGeoreference("geotransform".to_string()));
        }
        let spatial_ref = dataset.spatial_ref().trim();
        if spatial_ref.is_empty() {
            return Err(TileError::MissingGeoreference("projection".to_string()));
        }

        let native = Crs::new(spatial_ref);
        let (width, height) = dataset.size();
        let corners = geo_transform.extent_corners(width, height).to_vec();

        let ring = if native.is_wgs84() {
            corners
        } else {
            engine
                .transform_points(&corners, &native, &Crs::WGS84)
                .map_err(|e| TileError::TransformFailure(e.to_string()))?
        };

        Self::from_points(ring)
    }

    /// Footprint from a ring of WGS84 points.
    pub fn from_points(points: Vec<Point>) -> Result<Self, TileError> {
        let bounds = GeoBox::enclosing(&points, Crs::WGS84)
            .ok_or_else(|| TileError::TransformFailure("empty footprint".to_string()))?;
        Ok(Self {
            polygon: Polygon::new(points, Crs::WGS84),
            bounds,
        })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// WGS84 bounding box of the footprint.
    pub fn bounds(&self) -> &GeoBox {
        &self.bounds
    }

    /// True when the tile's box touches the footprint.
    pub fn intersects_tile(&self, key: &TileKey) -> bool {
        intersects(&self.polygon, &key.bounds().to_polygon())
    }
}
