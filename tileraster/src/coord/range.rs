//! Rectangular ranges of tiles at one zoom level.

use super::{CoordError, TileKey, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
use crate::geometry::GeoBox;

/// Inclusive rectangle of tiles at a single zoom level.
///
/// Iterates in row-major order (row `min_y` columns `min_x..=max_x`, then the
/// next row, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    zoom: u8,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl TileRange {
    /// Tiles whose boxes touch a WGS84 box.
    ///
    /// The box is clamped to the world extent first, so footprints that
    /// reach past the Mercator latitude limit still produce a range.
    pub fn covering(bounds: &GeoBox, zoom: u8) -> Result<TileRange, CoordError> {
        let west = bounds.min.x.clamp(MIN_LON, MAX_LON);
        let east = bounds.max.x.clamp(MIN_LON, MAX_LON);
        let south = bounds.min.y.clamp(MIN_LAT, MAX_LAT);
        let north = bounds.max.y.clamp(MIN_LAT, MAX_LAT);

        let north_west = TileKey::containing(west, north, zoom)?;
        let south_east = TileKey::containing(east, south, zoom)?;

        Ok(TileRange {
            zoom,
            min_x: north_west.x(),
            min_y: north_west.y(),
            max_x: south_east.x(),
            max_y: south_east.y(),
        })
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// North-west tile of the range.
    pub fn first(&self) -> TileKey {
        TileKey::from_parts_unchecked(self.zoom, self.min_x, self.min_y)
    }

    /// South-east tile of the range.
    pub fn last(&self) -> TileKey {
        TileKey::from_parts_unchecked(self.zoom, self.max_x, self.max_y)
    }

    pub fn width(&self) -> u64 {
        u64::from(self.max_x - self.min_x) + 1
    }

    pub fn height(&self) -> u64 {
        u64::from(self.max_y - self.min_y) + 1
    }

    /// Number of tiles in the range.
    pub fn count(&self) -> u64 {
        self.width() * self.height()
    }

    pub fn iter(&self) -> TileRangeIter {
        TileRangeIter {
            range: *self,
            current: 0,
        }
    }
}

impl IntoIterator for TileRange {
    type Item = TileKey;
    type IntoIter = TileRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the tiles of a [`TileRange`].
#[derive(Debug, Clone)]
pub struct TileRangeIter {
    range: TileRange,
    current: u64,
}

impl Iterator for TileRangeIter {
    type Item = TileKey;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.range.count() {
            return None;
        }

        let width = self.range.width();
        let x = self.range.min_x + (self.current % width) as u32;
        let y = self.range.min_y + (self.current / width) as u32;
        self.current += 1;

        Some(TileKey::from_parts_unchecked(self.range.zoom, x, y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.range.count() - self.current) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileRangeIter {}
