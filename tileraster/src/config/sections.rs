//! Typed configuration sections.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::DEFAULT_MAX_TILES;
use crate::engine::{ResampleKind, TileFormat};
use crate::tile::{RenderOptions, DEFAULT_RENDER_TIMEOUT, DEFAULT_TILE_SIZE};

/// Default HTTP listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `[server]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub format: TileFormat,
    pub resample: ResampleKind,
    pub tile_size: u32,
    /// Render timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: TileFormat::Png,
            resample: ResampleKind::Bilinear,
            tile_size: DEFAULT_TILE_SIZE,
            timeout_secs: DEFAULT_RENDER_TIMEOUT.as_secs(),
        }
    }
}

impl RenderConfig {
    pub fn to_options(&self) -> RenderOptions {
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        RenderOptions::default()
            .with_format(self.format)
            .with_resample(self.resample)
            .with_tile_size(self.tile_size)
            .with_timeout(timeout)
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub max_tiles: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_tiles: DEFAULT_MAX_TILES,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `tileraster=debug,warn`.
    pub level: String,
    /// Optional log file; logs go to stderr only when absent.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }
}

/// `[catalog]` and `[sources]` sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogConfig {
    /// Base directory for relative source paths.
    pub directory: Option<PathBuf>,
    /// Source identifier to raster path.
    pub sources: BTreeMap<String, PathBuf>,
}

impl CatalogConfig {
    pub fn with_source(mut self, id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.sources.insert(id.into(), path.into());
        self
    }

    /// Sources with relative paths joined onto `directory`.
    pub fn resolved_sources(&self) -> Vec<(String, PathBuf)> {
        self.sources
            .iter()
            .map(|(id, path)| {
                let resolved = match &self.directory {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path.clone(),
                };
                (id.clone(), resolved)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_to_options() {
        let options = RenderConfig {
            format: TileFormat::Jpeg,
            resample: ResampleKind::Nearest,
            tile_size: 512,
            timeout_secs: 0,
        }
        .to_options();
        assert_eq!(options.format, TileFormat::Jpeg);
        assert_eq!(options.resample, ResampleKind::Nearest);
        assert_eq!(options.tile_size, 512);
        assert!(options.timeout.is_none());

        let defaults = RenderConfig::default().to_options();
        assert_eq!(defaults, RenderOptions::default());
    }

    #[test]
    fn test_resolved_sources() {
        let catalog = CatalogConfig {
            directory: Some(PathBuf::from("/data/images")),
            ..Default::default()
        }
        .with_source("ac", "ac.tif")
        .with_source("abs", "/srv/drone.png");

        let resolved = catalog.resolved_sources();
        assert_eq!(
            resolved,
            vec![
                ("abs".to_string(), PathBuf::from("/srv/drone.png")),
                ("ac".to_string(), PathBuf::from("/data/images/ac.tif")),
            ]
        );
    }

    #[test]
    fn test_server_default_matches_constant() {
        assert_eq!(ServerConfig::default().bind.to_string(), DEFAULT_BIND);
    }
}
