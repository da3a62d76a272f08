//! Seed command - render every tile of a source over a zoom range.
//!
//! Tiles are written as `<output>/<source>/<z>/<x>/<y>.<ext>`. Tiles whose
//! box misses the source footprint are skipped, and existing files are kept
//! unless `--force` is given.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use clap::Args;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tileraster::config::ConfigFile;
use tileraster::coord::{TileRange, MAX_ZOOM};
use tileraster::engine::{ImageEngine, TileFormat};
use tileraster::source::SourceFootprint;
use tileraster::{TileCatalog, TileError, TileKey};
use tracing::{info, warn};

use super::common::{build_catalog, resolve_source, runtime, RenderArgs};
use crate::error::CliError;

/// Arguments for the seed command.
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Source identifier from the configuration, or a raster file
    pub source: String,

    /// Lowest zoom level to render
    #[arg(long, default_value_t = 0)]
    pub min_zoom: u8,

    /// Highest zoom level to render
    #[arg(long)]
    pub max_zoom: u8,

    /// Output directory
    #[arg(short, long, default_value = "tiles")]
    pub output: PathBuf,

    /// Tiles rendered concurrently (default: available CPUs)
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Re-render tiles that already exist on disk
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// What a seed run does.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub id: String,
    pub zooms: RangeInclusive<u8>,
    pub root: PathBuf,
    pub format: TileFormat,
    pub parallel: usize,
    pub force: bool,
}

/// Tile counts of a finished seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub written: u64,
    pub existing: u64,
    pub outside: u64,
    pub failed: u64,
}

enum TileOutcome {
    Written,
    Existing,
    Outside,
}

/// Path of one seeded tile under `root`.
pub fn tile_path(root: &Path, key: &TileKey, format: TileFormat) -> PathBuf {
    root.join(key.zoom().to_string())
        .join(key.x().to_string())
        .join(format!("{}.{}", key.y(), format.extension()))
}

/// Run the seed command.
pub fn run(args: SeedArgs, mut config: ConfigFile) -> Result<(), CliError> {
    if args.min_zoom > args.max_zoom || args.max_zoom > MAX_ZOOM {
        return Err(CliError::Config(format!(
            "Invalid zoom range {}..={} (zoom levels go up to {})",
            args.min_zoom, args.max_zoom, MAX_ZOOM
        )));
    }

    args.render.apply(&mut config);
    let id = resolve_source(&mut config, &args.source)?;

    let parallel = args
        .parallel
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(4)
        .max(1);

    let plan = SeedPlan {
        root: args.output.join(&id),
        id,
        zooms: args.min_zoom..=args.max_zoom,
        format: config.render.format,
        parallel,
        force: args.force,
    };

    println!(
        "Seeding '{}' zoom {}..={} into {}",
        plan.id,
        plan.zooms.start(),
        plan.zooms.end(),
        plan.root.display()
    );

    let catalog = build_catalog(&config);
    let summary = runtime()?.block_on(seed(&catalog, &plan, true))?;

    println!();
    println!("  Written:  {}", summary.written);
    println!("  Existing: {}", summary.existing);
    println!("  Outside:  {}", summary.outside);
    println!("  Failed:   {}", summary.failed);

    if summary.failed > 0 {
        return Err(CliError::SeedFailures(summary.failed));
    }
    Ok(())
}

fn progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "{wide_bar:0.white/dim.white} {pos:>9}/{len:9} {per_sec:18} {elapsed_precise} {eta_precise}",
    ) {
        bar.set_style(style.progress_chars("██▁"));
    }
    bar
}

/// Render every tile of the plan that touches the source footprint.
pub async fn seed(
    catalog: &TileCatalog<ImageEngine>,
    plan: &SeedPlan,
    show_progress: bool,
) -> Result<SeedSummary, CliError> {
    let source = catalog.source(&plan.id).await?;
    let (_, footprint) = source.ready()?;

    let ranges = plan
        .zooms
        .clone()
        .map(|zoom| TileRange::covering(footprint.bounds(), zoom))
        .collect::<Result<Vec<_>, _>>()?;
    let total: u64 = ranges.iter().map(TileRange::count).sum();
    info!(source = %plan.id, tiles = total, "Seeding tiles");

    let progress = progress_bar(total, show_progress);
    let mut summary = SeedSummary::default();

    let mut results = stream::iter(ranges.into_iter().flatten())
        .map(|key| seed_tile(catalog, plan, footprint, key))
        .buffer_unordered(plan.parallel);

    while let Some((key, outcome)) = results.next().await {
        match outcome {
            Ok(TileOutcome::Written) => summary.written += 1,
            Ok(TileOutcome::Existing) => summary.existing += 1,
            Ok(TileOutcome::Outside) | Err(TileError::TileOutsideSource(_)) => summary.outside += 1,
            Err(e) => {
                summary.failed += 1;
                warn!(tile = %key, error = %e, "Tile failed");
            }
        }
        progress.inc(1);
    }
    progress.finish();

    Ok(summary)
}

async fn seed_tile(
    catalog: &TileCatalog<ImageEngine>,
    plan: &SeedPlan,
    footprint: &SourceFootprint,
    key: TileKey,
) -> (TileKey, Result<TileOutcome, TileError>) {
    if !footprint.intersects_tile(&key) {
        return (key, Ok(TileOutcome::Outside));
    }

    let path = tile_path(&plan.root, &key, plan.format);
    if !plan.force && path.exists() {
        return (key, Ok(TileOutcome::Existing));
    }
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return (key, Err(TileError::RenderFailure(e.to_string())));
        }
    }

    let result = catalog.save_tile(&plan.id, key, &path).await;
    (key, result.map(|()| TileOutcome::Written))
}
