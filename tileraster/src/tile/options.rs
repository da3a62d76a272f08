//! Render configuration.

use std::time::Duration;

use crate::coord::TileKey;
use crate::engine::{ResampleKind, TileFormat, WarpOptions};
use crate::geometry::Crs;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default upper bound for one engine render.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration applied to every tile a renderer produces.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Output width and height in pixels.
    pub tile_size: u32,
    pub resample: ResampleKind,
    pub format: TileFormat,
    /// CRS the tile raster is produced in.
    pub target_crs: Crs,
    /// Upper bound for one render; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            resample: ResampleKind::Bilinear,
            format: TileFormat::Png,
            target_crs: Crs::PSEUDO_MERCATOR,
            timeout: Some(DEFAULT_RENDER_TIMEOUT),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_resample(mut self, resample: ResampleKind) -> Self {
        self.resample = resample;
        self
    }

    pub fn with_format(mut self, format: TileFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target_crs(mut self, crs: Crs) -> Self {
        self.target_crs = crs;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Warp parameters for one tile: the tile's WGS84 box as output bounds.
    pub fn warp_options(&self, key: &TileKey) -> WarpOptions {
        WarpOptions {
            output_bounds: key.bounds(),
            target_crs: self.target_crs.clone(),
            width: self.tile_size,
            height: self.tile_size,
            resample: self.resample,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.tile_size, 256);
        assert_eq!(options.resample, ResampleKind::Bilinear);
        assert_eq!(options.format, TileFormat::Png);
        assert_eq!(options.target_crs, Crs::PSEUDO_MERCATOR);
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_builder() {
        let options = RenderOptions::new()
            .with_tile_size(512)
            .with_resample(ResampleKind::Nearest)
            .with_format(TileFormat::Jpeg)
            .with_timeout(None);
        assert_eq!(options.tile_size, 512);
        assert_eq!(options.resample, ResampleKind::Nearest);
        assert_eq!(options.format, TileFormat::Jpeg);
        assert!(options.timeout.is_none());
    }

    #[test]
    fn test_warp_options_use_tile_box() {
        let key = TileKey::new(3, 4, 2).unwrap();
        let warp = RenderOptions::default().warp_options(&key);
        assert_eq!(warp.output_bounds, key.bounds());
        assert_eq!(warp.output_bounds.crs, Crs::WGS84);
        assert_eq!((warp.width, warp.height), (256, 256));
    }
}
