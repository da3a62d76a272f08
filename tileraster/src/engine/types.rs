//! Value types exchanged with a raster engine.

use std::fmt;
use std::str::FromStr;

use super::EngineError;
use crate::geometry::{Crs, GeoBox, Point};

/// Affine georeference: six coefficients in GDAL order.
///
/// ```text
/// X = gt[0] + col * gt[1] + row * gt[2]
/// Y = gt[3] + col * gt[4] + row * gt[5]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform(pub [f64; 6]);

impl GeoTransform {
    /// The transform datasets report when they carry no georeference.
    pub const IDENTITY: GeoTransform = GeoTransform([0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// North-up transform from an upper-left origin and pixel sizes.
    pub fn north_up(origin: Point, pixel_width: f64, pixel_height: f64) -> Self {
        Self([origin.x, pixel_width, 0.0, origin.y, 0.0, -pixel_height])
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// Maps a (fractional) pixel position to CRS coordinates.
    pub fn apply(&self, col: f64, row: f64) -> Point {
        let gt = &self.0;
        Point::new(
            gt[0] + col * gt[1] + row * gt[2],
            gt[3] + col * gt[4] + row * gt[5],
        )
    }

    /// Maps CRS coordinates back to a fractional pixel position.
    ///
    /// `None` when the transform is singular.
    pub fn invert(&self, p: Point) -> Option<(f64, f64)> {
        let gt = &self.0;
        let det = gt[1] * gt[5] - gt[2] * gt[4];
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let dx = p.x - gt[0];
        let dy = p.y - gt[3];
        let col = (gt[5] * dx - gt[2] * dy) / det;
        let row = (gt[1] * dy - gt[4] * dx) / det;
        Some((col, row))
    }

    /// The four corners of a `width` x `height` raster, counter-clockwise
    /// from the lower-left corner.
    pub fn extent_corners(&self, width: u32, height: u32) -> [Point; 4] {
        let (w, h) = (f64::from(width), f64::from(height));
        [
            self.apply(0.0, h),
            self.apply(w, h),
            self.apply(w, 0.0),
            self.apply(0.0, 0.0),
        ]
    }
}

/// Pixel resampling used when warping a source into a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResampleKind {
    Nearest,
    #[default]
    Bilinear,
}

impl ResampleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResampleKind::Nearest => "nearest",
            ResampleKind::Bilinear => "bilinear",
        }
    }
}

impl fmt::Display for ResampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResampleKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "near" => Ok(ResampleKind::Nearest),
            "bilinear" => Ok(ResampleKind::Bilinear),
            other => Err(EngineError::Unsupported(format!(
                "resampling '{}' (expected nearest or bilinear)",
                other
            ))),
        }
    }
}

/// Encoded tile image format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TileFormat {
    #[default]
    Png,
    Jpeg,
}

impl TileFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            TileFormat::Png => "image/png",
            TileFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpeg",
        })
    }
}

impl FromStr for TileFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(TileFormat::Png),
            "jpeg" | "jpg" => Ok(TileFormat::Jpeg),
            other => Err(EngineError::Unsupported(format!(
                "tile format '{}' (expected png or jpeg)",
                other
            ))),
        }
    }
}

/// Parameters of one warp call.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpOptions {
    /// Output extent, expressed in the CRS carried by the box.
    pub output_bounds: GeoBox,
    /// CRS of the produced raster.
    pub target_crs: Crs,
    pub width: u32,
    pub height: u32,
    pub resample: ResampleKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_detection() {
        assert!(GeoTransform::IDENTITY.is_identity());
        assert!(!GeoTransform::north_up(Point::new(0.0, 0.0), 1.0, 1.0).is_identity());
    }

    #[test]
    fn test_apply_and_invert() {
        let gt = GeoTransform::north_up(Point::new(-10.0, 50.0), 0.5, 0.25);
        let p = gt.apply(4.0, 8.0);
        assert_eq!(p, Point::new(-8.0, 48.0));
        let (col, row) = gt.invert(p).unwrap();
        assert!((col - 4.0).abs() < 1e-12);
        assert!((row - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_invert_with_rotation() {
        let gt = GeoTransform([100.0, 2.0, 0.5, 200.0, 0.3, -2.0]);
        let p = gt.apply(7.5, 3.25);
        let (col, row) = gt.invert(p).unwrap();
        assert!((col - 7.5).abs() < 1e-9);
        assert!((row - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_singular_transform() {
        let gt = GeoTransform([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(gt.invert(Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_extent_corners_include_rotation() {
        let gt = GeoTransform([0.0, 1.0, 0.5, 10.0, 0.25, -1.0]);
        let [ll, lr, ur, ul] = gt.extent_corners(4, 2);
        assert_eq!(ul, Point::new(0.0, 10.0));
        assert_eq!(ur, Point::new(4.0, 11.0));
        assert_eq!(lr, Point::new(5.0, 9.0));
        assert_eq!(ll, Point::new(1.0, 8.0));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<TileFormat>().unwrap(), TileFormat::Png);
        assert_eq!("jpg".parse::<TileFormat>().unwrap(), TileFormat::Jpeg);
        assert!("webp".parse::<TileFormat>().is_err());
        assert_eq!(TileFormat::Jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_resample_parsing() {
        assert_eq!(ResampleKind::default(), ResampleKind::Bilinear);
        assert_eq!(" Nearest ".parse::<ResampleKind>().unwrap(), ResampleKind::Nearest);
        assert!("cubic".parse::<ResampleKind>().is_err());
    }
}
