//! Tile command - render one tile to a file.

use std::path::PathBuf;

use clap::Args;
use tileraster::config::ConfigFile;
use tileraster::engine::TileFormat;
use tileraster::TileKey;

use super::common::{build_catalog, parse_tile, resolve_source, runtime, RenderArgs};
use crate::error::CliError;

/// Arguments for the tile command.
#[derive(Debug, Args)]
pub struct TileArgs {
    /// Source identifier from the configuration, or a raster file
    pub source: String,

    /// Tile as z/x/y or as a quadkey
    pub tile: String,

    /// Output file (default: <source>_<z>_<x>_<y>.<ext> in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Default output name for a single tile.
pub fn default_output(source: &str, key: &TileKey, format: TileFormat) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}_{}_{}.{}",
        source,
        key.zoom(),
        key.x(),
        key.y(),
        format.extension()
    ))
}

/// Run the tile command.
pub fn run(args: TileArgs, mut config: ConfigFile) -> Result<(), CliError> {
    let key = parse_tile(&args.tile)?;
    args.render.apply(&mut config);
    let id = resolve_source(&mut config, &args.source)?;

    let output = args
        .output
        .unwrap_or_else(|| default_output(&id, &key, config.render.format));

    let catalog = build_catalog(&config);
    runtime()?.block_on(catalog.save_tile(&id, key, &output))?;

    println!("Wrote {} (tile {}, quadkey {})", output.display(), key, key.quadkey());
    Ok(())
}
