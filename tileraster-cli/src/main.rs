//! tileraster CLI - command-line interface
//!
//! Serves slippy-map tiles cut from georeferenced rasters, renders single
//! tiles to disk and seeds tile directories.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tileraster::config::ConfigFile;
use tracing::debug;

use commands::common::{load_config, setup_logging};
use commands::{info, quadkey, seed, serve, tile};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tileraster", version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/tileraster/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter, overriding the configuration (e.g. debug, tileraster=trace)
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve tiles over HTTP
    Serve(serve::ServeArgs),
    /// Render one tile to a file
    Tile(tile::TileArgs),
    /// Render every tile of a source over a zoom range into a directory
    Seed(seed::SeedArgs),
    /// Show a source's georeference, footprint and tile counts
    Info(info::InfoArgs),
    /// Convert between z/x/y and quadkeys
    Quadkey(quadkey::QuadkeyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Quadkey conversion needs neither configuration nor logging.
    let command = match cli.command {
        Commands::Quadkey(args) => return quadkey::run(args),
        other => other,
    };

    let config: ConfigFile = load_config(cli.config.as_deref())?;
    let _guard = setup_logging(&config, cli.log_level.as_deref())?;
    debug!(version = env!("CARGO_PKG_VERSION"), "tileraster starting");

    match command {
        Commands::Serve(args) => serve::run(args, config),
        Commands::Tile(args) => tile::run(args, config),
        Commands::Seed(args) => seed::run(args, config),
        Commands::Info(args) => info::run(args, config),
        Commands::Quadkey(args) => quadkey::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_sources() {
        let cli = Cli::try_parse_from([
            "tileraster",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--source",
            "ac=/data/ac.tif",
            "--source",
            "dr=drone.png",
            "--format",
            "jpeg",
        ])
        .unwrap();

        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind.unwrap().port(), 9000);
        assert_eq!(args.sources.len(), 2);
        assert_eq!(args.sources[0], ("ac".to_string(), PathBuf::from("/data/ac.tif")));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tileraster",
            "quadkey",
            "3/4/2",
            "--log-level",
            "debug",
            "--config",
            "/etc/tileraster.ini",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/tileraster.ini")));
    }

    #[test]
    fn test_seed_requires_max_zoom() {
        assert!(Cli::try_parse_from(["tileraster", "seed", "ac"]).is_err());
        assert!(Cli::try_parse_from(["tileraster", "seed", "ac", "--max-zoom", "5"]).is_ok());
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        assert!(Cli::try_parse_from(["tileraster", "tile", "ac", "3/4/2", "--tile-size", "0"]).is_err());
    }
}
