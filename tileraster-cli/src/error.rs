//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;
use tileraster::config::ConfigError;
use tileraster::coord::CoordError;
use tileraster::logging::LoggingError;
use tileraster::server::ServerError;
use tileraster::TileError;

/// Errors surfaced to the user by the `tileraster` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Serve(#[from] ServerError),

    #[error("Invalid tile '{input}': {reason}")]
    InvalidTile { input: String, reason: String },

    #[error("Unknown source '{0}': not in the configuration and not an existing file")]
    UnknownSource(String),

    #[error("{0}")]
    Tile(#[from] TileError),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("{0} tiles failed to render")]
    SeedFailures(u64),

    #[error("Failed to create {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
