//! Coordinate type definitions

use std::fmt;
use std::str::FromStr;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.051_128_779_806_59;
pub const MAX_LAT: f64 = 85.051_128_779_806_59;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels addressable with 32-bit tile indices.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 31;

/// Slippy-map tile address.
///
/// `x` grows eastward from the antimeridian, `y` grows southward from the
/// northern Mercator limit. Both are always below `2^zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    zoom: u8,
    x: u32,
    y: u32,
}

impl TileKey {
    /// Create a tile key, validating that `x` and `y` fit the zoom level.
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let n = Self::tiles_per_axis(zoom);
        if u64::from(x) >= n || u64::from(y) >= n {
            return Err(CoordError::InvalidTile { zoom, x, y });
        }
        Ok(Self { zoom, x, y })
    }

    /// The single tile covering the whole world.
    pub const fn root() -> Self {
        Self { zoom: 0, x: 0, y: 0 }
    }

    /// Number of tiles along one axis at `zoom`.
    #[inline]
    pub fn tiles_per_axis(zoom: u8) -> u64 {
        1u64 << zoom
    }

    /// Zoom level.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Column, increasing eastward.
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Row, increasing southward.
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Only used by the quadkey decoder, which produces in-range values by
    /// construction.
    pub(crate) fn from_parts_unchecked(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Parses a quadkey into a tile key.
impl FromStr for TileKey {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::quadkey::decode(s)
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180 to 180)
    InvalidLongitude(f64),
    /// Zoom level is outside valid range (0 to 31)
    InvalidZoom(u8),
    /// Column or row does not exist at the given zoom level
    InvalidTile { zoom: u8, x: u32, y: u32 },
    /// Quadkey contains invalid characters or is too long
    InvalidQuadKey(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::InvalidTile { zoom, x, y } => {
                write!(
                    f,
                    "Invalid tile {}/{}/{}: x and y must be below {}",
                    zoom,
                    x,
                    y,
                    TileKey::tiles_per_axis(*zoom)
                )
            }
            CoordError::InvalidQuadKey(quadkey) => {
                write!(
                    f,
                    "Invalid quadkey: '{}' (must contain only digits 0-3 and length <= {})",
                    quadkey, MAX_ZOOM
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
