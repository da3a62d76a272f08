//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, ValueEnum};
use tileraster::config::ConfigFile;
use tileraster::coord::{quadkey, TileKey};
use tileraster::engine::{ImageEngine, ResampleKind, TileFormat};
use tileraster::logging::{init_logging, LoggingGuard};
use tileraster::TileCatalog;
use tokio::runtime::Runtime;

use crate::error::CliError;

/// Tile encoding selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum FormatArg {
    /// PNG with alpha; pixels outside the source are transparent
    Png,
    /// JPEG; smaller, no transparency
    Jpeg,
}

impl From<FormatArg> for TileFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Png => TileFormat::Png,
            FormatArg::Jpeg => TileFormat::Jpeg,
        }
    }
}

/// Resampling selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ResampleArg {
    /// Nearest neighbour
    Nearest,
    /// Bilinear interpolation
    Bilinear,
}

impl From<ResampleArg> for ResampleKind {
    fn from(resample: ResampleArg) -> Self {
        match resample {
            ResampleArg::Nearest => ResampleKind::Nearest,
            ResampleArg::Bilinear => ResampleKind::Bilinear,
        }
    }
}

/// Render settings that override the `[render]` section.
#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// Tile encoding
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Resampling method
    #[arg(long, value_enum)]
    pub resample: Option<ResampleArg>,

    /// Tile edge length in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=4096))]
    pub tile_size: Option<u32>,
}

impl RenderArgs {
    /// Apply CLI overrides; CLI takes precedence over the config file.
    pub fn apply(&self, config: &mut ConfigFile) {
        if let Some(format) = self.format {
            config.render.format = format.into();
        }
        if let Some(resample) = self.resample {
            config.render.resample = resample.into();
        }
        if let Some(tile_size) = self.tile_size {
            config.render.tile_size = tile_size;
        }
    }
}

/// Load the configuration from an explicit path or the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::load_default()?,
    };
    Ok(config)
}

/// Install logging, with `level` overriding the configured filter.
pub fn setup_logging(config: &ConfigFile, level: Option<&str>) -> Result<LoggingGuard, CliError> {
    let mut logging = config.logging.clone();
    if let Some(level) = level {
        logging = logging.with_level(level);
    }
    Ok(init_logging(&logging)?)
}

/// Parse a `ID=PATH` source definition.
pub fn parse_source_arg(arg: &str) -> Result<(String, PathBuf), String> {
    let (id, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ID=PATH, got '{}'", arg))?;
    let (id, path) = (id.trim(), path.trim());
    if id.is_empty() || path.is_empty() {
        return Err(format!("expected ID=PATH, got '{}'", arg));
    }
    Ok((id.to_string(), PathBuf::from(path)))
}

/// Resolve a source argument to a catalog identifier.
///
/// Configured identifiers win. Otherwise an existing file is added to the
/// catalog under its file stem.
pub fn resolve_source(config: &mut ConfigFile, source: &str) -> Result<String, CliError> {
    if config.catalog.sources.contains_key(source) {
        return Ok(source.to_string());
    }

    let path = Path::new(source);
    if !path.is_file() {
        return Err(CliError::UnknownSource(source.to_string()));
    }

    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());
    config.catalog.sources.insert(id.clone(), path.to_path_buf());
    Ok(id)
}

/// Parse a tile given as `z/x/y` or as a quadkey.
pub fn parse_tile(input: &str) -> Result<TileKey, CliError> {
    let invalid = |reason: String| CliError::InvalidTile {
        input: input.to_string(),
        reason,
    };

    if input.contains('/') {
        let parts: Vec<&str> = input.split('/').collect();
        let [z, x, y] = parts.as_slice() else {
            return Err(invalid("expected z/x/y".to_string()));
        };
        let zoom = z.parse::<u8>().map_err(|e| invalid(format!("zoom: {}", e)))?;
        let col = x.parse::<u32>().map_err(|e| invalid(format!("x: {}", e)))?;
        let row = y.parse::<u32>().map_err(|e| invalid(format!("y: {}", e)))?;
        return TileKey::new(zoom, col, row).map_err(|e| invalid(e.to_string()));
    }

    if input.is_empty() {
        return Err(invalid("empty tile".to_string()));
    }
    quadkey::decode(input).map_err(|e| invalid(e.to_string()))
}

/// Build a catalog over the configured sources with the bundled engine.
pub fn build_catalog(config: &ConfigFile) -> Arc<TileCatalog<ImageEngine>> {
    Arc::new(TileCatalog::from_config(Arc::new(ImageEngine::new()), config))
}

/// Multi-threaded runtime for the async commands.
pub fn runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}
