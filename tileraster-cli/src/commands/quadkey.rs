//! Quadkey command - convert between z/x/y and quadkeys.

use clap::Args;

use super::common::parse_tile;
use crate::error::CliError;

/// Arguments for the quadkey command.
#[derive(Debug, Args)]
pub struct QuadkeyArgs {
    /// Tile as z/x/y or as a quadkey
    pub tile: String,
}

/// Run the quadkey command.
pub fn run(args: QuadkeyArgs) -> Result<(), CliError> {
    let key = parse_tile(&args.tile)?;
    let quad_key = key.quadkey();
    let bounds = key.bounds();

    println!("Tile:    {}", key);
    println!(
        "Quadkey: {}",
        if quad_key.is_empty() { "(root)" } else { quad_key.as_str() }
    );
    println!(
        "Bounds:  {:.6}, {:.6}, {:.6}, {:.6}",
        bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y
    );
    Ok(())
}
