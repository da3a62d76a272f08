//! Info command - describe one source.

use clap::Args;
use tileraster::config::ConfigFile;
use tileraster::coord::{TileRange, MAX_ZOOM};
use tileraster::engine::Dataset;

use super::common::{build_catalog, resolve_source, runtime};
use crate::error::CliError;

/// Arguments for the info command.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Source identifier from the configuration, or a raster file
    pub source: String,

    /// Lowest zoom level in the tile table
    #[arg(long, default_value_t = 0)]
    pub min_zoom: u8,

    /// Highest zoom level in the tile table
    #[arg(long, default_value_t = 12)]
    pub max_zoom: u8,
}

/// Run the info command.
pub fn run(args: InfoArgs, mut config: ConfigFile) -> Result<(), CliError> {
    let id = resolve_source(&mut config, &args.source)?;
    let catalog = build_catalog(&config);
    let source = runtime()?.block_on(catalog.source(&id))?;

    println!("Source: {}", source.id());
    println!("Path:   {}", source.path().display());
    println!("Status: {}", source.status());

    let (dataset, footprint) = match source.ready() {
        Ok(ready) => ready,
        Err(e) => {
            println!("Error:  {}", e);
            return Err(e.into());
        }
    };

    let (width, height) = dataset.size();
    let gt = dataset.geo_transform().coefficients();
    println!("Size:   {} x {} pixels", width, height);
    println!("Origin: {}, {}", gt[0], gt[3]);
    println!("Pixel:  {} x {}", gt[1], gt[5]);
    println!("SRS:    {}", dataset.spatial_ref());

    let bounds = footprint.bounds();
    println!();
    println!("Footprint (WGS84)");
    println!("  West:  {:>12.6}", bounds.min.x);
    println!("  South: {:>12.6}", bounds.min.y);
    println!("  East:  {:>12.6}", bounds.max.x);
    println!("  North: {:>12.6}", bounds.max.y);

    let max_zoom = args.max_zoom.min(MAX_ZOOM);
    if args.min_zoom <= max_zoom {
        println!();
        println!("{:>4}  {:>14}  {:<20}  {:<20}", "zoom", "tiles", "first", "last");
        for zoom in args.min_zoom..=max_zoom {
            let range = TileRange::covering(bounds, zoom)?;
            println!(
                "{:>4}  {:>14}  {:<20}  {:<20}",
                zoom,
                range.count(),
                range.first().to_string(),
                range.last().to_string()
            );
        }
    }

    Ok(())
}
