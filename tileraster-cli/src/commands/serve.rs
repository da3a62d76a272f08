//! Serve command - run the HTTP tile server.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use tileraster::config::ConfigFile;
use tileraster::server;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::common::{build_catalog, parse_source_arg, runtime, RenderArgs};
use crate::error::CliError;

/// Arguments for the serve command.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, value_name = "HOST:PORT")]
    pub bind: Option<SocketAddr>,

    /// Extra source, repeatable
    #[arg(long = "source", value_name = "ID=PATH", value_parser = parse_source_arg)]
    pub sources: Vec<(String, PathBuf)>,

    /// Maximum number of rendered tiles kept in memory
    #[arg(long)]
    pub max_tiles: Option<u64>,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Run the serve command.
pub fn run(args: ServeArgs, mut config: ConfigFile) -> Result<(), CliError> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(max_tiles) = args.max_tiles {
        config.cache.max_tiles = max_tiles;
    }
    for (id, path) in args.sources {
        config.catalog.sources.insert(id, path);
    }
    args.render.apply(&mut config);

    if config.catalog.sources.is_empty() {
        return Err(CliError::Config(
            "No sources configured. Add a [sources] section to config.ini or use --source ID=PATH."
                .to_string(),
        ));
    }

    let catalog = build_catalog(&config);

    println!("tileraster v{}", env!("CARGO_PKG_VERSION"));
    println!("================");
    println!();
    println!("Listening:  http://{}", config.server.bind);
    println!("Format:     {}", config.render.format);
    println!("Resample:   {}", config.render.resample);
    println!("Tile size:  {}", config.render.tile_size);
    println!("Cache:      {} tiles", config.cache.max_tiles);
    println!();
    println!("Sources:");
    for (id, path) in config.catalog.resolved_sources() {
        println!("  {:<12} {}", id, path.display());
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let bind = config.server.bind;
    let server_catalog = catalog.clone();
    runtime()?.block_on(async move {
        let listener = server::bind(bind).await?;

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received shutdown signal");
                    signal.cancel();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
            }
        });

        server::serve(listener, server_catalog, shutdown).await
    })?;

    let stats = catalog.stats();
    println!();
    println!("Session Summary");
    println!("───────────────");
    println!(
        "  Requests: {} ({} cache hits, {:.0}% hit rate)",
        stats.hits + stats.misses,
        stats.hits,
        stats.hit_rate() * 100.0
    );
    println!("  Renders:  {} ({} failed)", stats.renders, stats.failures);
    println!("  Sources:  {} of {} opened", stats.sources_open, stats.sources_configured);
    Ok(())
}
