//! Planar geometry in a named coordinate reference system.
//!
//! Tile boxes and source footprints are compared here. All shapes carry the
//! CRS their coordinates are expressed in; reprojection between CRSs is the
//! raster engine's job and must happen before any comparison.

mod bbox;
mod polygon;

pub use bbox::GeoBox;
pub use polygon::{intersects, Polygon};

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// PROJ.4 definition of WGS84 longitude/latitude in degrees.
pub const SRS_WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// PROJ.4 definition of spherical (pseudo) Mercator, EPSG:3857.
pub const SRS_PSEUDO_MERCATOR: &str = "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 \
     +x_0=0 +y_0=0 +k=1 +units=m +nadgrids=@null +wktext +no_defs";

/// A 2D coordinate pair. For geographic CRSs `x` is longitude, `y` latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Named coordinate reference system.
///
/// Holds either a PROJ.4 definition (`+proj=...`) or an `EPSG:<code>`
/// reference. Two CRSs are the same when their definitions are textually
/// equal after trimming.
#[derive(Debug, Clone, Eq)]
pub struct Crs(Cow<'static, str>);

impl Crs {
    /// WGS84 longitude/latitude, the CRS tile boxes and footprints live in.
    pub const WGS84: Crs = Crs(Cow::Borrowed(SRS_WGS84));

    /// Spherical Mercator, the CRS rendered tiles are produced in.
    pub const PSEUDO_MERCATOR: Crs = Crs(Cow::Borrowed(SRS_PSEUDO_MERCATOR));

    pub fn new(definition: impl Into<String>) -> Self {
        Self(Cow::Owned(definition.into().trim().to_string()))
    }

    /// CRS referenced by an EPSG code.
    pub fn epsg(code: u16) -> Self {
        Self(Cow::Owned(format!("EPSG:{code}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// EPSG code, when this CRS is an `EPSG:<code>` reference.
    pub fn epsg_code(&self) -> Option<u16> {
        let rest = self.0.strip_prefix("EPSG:").or_else(|| self.0.strip_prefix("epsg:"))?;
        rest.trim().parse().ok()
    }

    /// True for the two spellings of WGS84 this crate produces itself.
    pub fn is_wgs84(&self) -> bool {
        *self == Crs::WGS84 || self.epsg_code() == Some(4326)
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        self.0.trim() == other.0.trim()
    }
}

impl Hash for Crs {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.trim().hash(state);
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_equality_trims() {
        assert_eq!(Crs::new(format!("  {SRS_WGS84}\n")), Crs::WGS84);
        assert_ne!(Crs::WGS84, Crs::PSEUDO_MERCATOR);
    }

    #[test]
    fn test_crs_epsg_code() {
        assert_eq!(Crs::epsg(3857).epsg_code(), Some(3857));
        assert_eq!(Crs::new("epsg:4326").epsg_code(), Some(4326));
        assert_eq!(Crs::WGS84.epsg_code(), None);
    }

    #[test]
    fn test_crs_is_wgs84() {
        assert!(Crs::WGS84.is_wgs84());
        assert!(Crs::epsg(4326).is_wgs84());
        assert!(!Crs::epsg(3857).is_wgs84());
    }
}
