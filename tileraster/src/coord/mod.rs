//! Coordinate conversion module
//!
//! Provides conversions between slippy-map tile addresses, quadkeys and
//! geographic (WGS84) coordinates.

pub mod quadkey;
mod range;
mod types;

pub use range::TileRange;
pub use types::{CoordError, TileKey, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM};

use std::f64::consts::PI;

use crate::geometry::{Crs, GeoBox, Point};

/// Converts a tile corner to longitude/latitude in degrees.
///
/// `(x, y)` is the north-west corner of tile `(x, y)`; values up to `2^zoom`
/// are meaningful so the far corners of the last row and column can be
/// addressed. The evaluation order matches the OpenStreetMap slippy-map
/// formula exactly so that boxes agree bit for bit with other tooling.
#[inline]
pub fn tile_corner(zoom: u8, x: u64, y: u64) -> Point {
    let n = 2.0_f64.powi(zoom as i32);
    let lon = x as f64 / n * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan();
    Point::new(lon, lat_rad.to_degrees())
}

/// Converts a tile address to its WGS84 bounding box.
///
/// Built from the south-west corner `(x, y + 1)` and the north-east corner
/// `(x + 1, y)`. Total for any input; callers validate ranges via
/// [`TileKey::new`].
#[inline]
pub fn tile_to_lon_lat_box(zoom: u8, x: u32, y: u32) -> GeoBox {
    let south_west = tile_corner(zoom, u64::from(x), u64::from(y) + 1);
    let north_east = tile_corner(zoom, u64::from(x) + 1, u64::from(y));
    GeoBox {
        min: south_west,
        max: north_east,
        crs: Crs::WGS84,
    }
}

impl TileKey {
    /// WGS84 bounding box of this tile.
    pub fn bounds(&self) -> GeoBox {
        tile_to_lon_lat_box(self.zoom(), self.x(), self.y())
    }

    /// Tile containing a geographic position.
    ///
    /// Latitudes beyond the Mercator limit are rejected, as are longitudes
    /// outside -180..=180. Positions on the east or south edge of the world
    /// map to the last column or row.
    #[inline]
    pub fn containing(lon: f64, lat: f64, zoom: u8) -> Result<TileKey, CoordError> {
        // Validate inputs
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }

        let n = 2.0_f64.powi(zoom as i32);
        let last = TileKey::tiles_per_axis(zoom) - 1;

        // Longitude to column
        let col = ((lon + 180.0) / 360.0 * n).floor() as u64;

        // Latitude to row using Web Mercator projection
        let lat_rad = lat * PI / 180.0;
        let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor().max(0.0) as u64;

        TileKey::new(zoom, col.min(last) as u32, row.min(last) as u32)
    }
}
