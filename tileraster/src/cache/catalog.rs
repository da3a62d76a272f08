//! The tile catalog.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use super::memo::RenderedTileCache;
use super::stats::{CatalogStats, Counters};
use crate::config::ConfigFile;
use crate::coord::TileKey;
use crate::engine::RasterEngine;
use crate::error::TileError;
use crate::source::RasterSource;
use crate::tile::{RenderOptions, RenderedTile, TileRenderer};

type SourceCell<D> = Arc<OnceCell<Arc<RasterSource<D>>>>;

/// Status line for one configured source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub id: String,
    pub path: PathBuf,
    /// `None` until the source is first requested.
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Lazily opened sources plus a single-flight LRU of rendered tiles.
///
/// Constructed explicitly and shared behind an `Arc`; there is no global
/// instance. Engine work runs on the blocking thread pool.
pub struct TileCatalog<E: RasterEngine> {
    renderer: Arc<TileRenderer<E>>,
    entries: BTreeMap<String, PathBuf>,
    sources: DashMap<String, SourceCell<E::Dataset>>,
    rendered: RenderedTileCache,
    counters: Arc<Counters>,
}

impl<E: RasterEngine> TileCatalog<E> {
    /// Create a catalog.
    ///
    /// # Arguments
    ///
    /// * `engine` - Raster engine shared by every source
    /// * `entries` - Source identifiers and the paths they open
    /// * `options` - Render options applied to every tile
    /// * `max_tiles` - Capacity of the rendered-tile memo
    pub fn new<I, K, P>(engine: Arc<E>, entries: I, options: RenderOptions, max_tiles: u64) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            renderer: Arc::new(TileRenderer::new(engine, options)),
            entries: entries
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
            sources: DashMap::new(),
            rendered: RenderedTileCache::new(max_tiles),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Create a catalog from the `[sources]`, `[catalog]`, `[render]` and
    /// `[cache]` sections of a configuration file.
    pub fn from_config(engine: Arc<E>, config: &ConfigFile) -> Self {
        Self::new(
            engine,
            config.catalog.resolved_sources(),
            config.render.to_options(),
            config.cache.max_tiles,
        )
    }

    pub fn options(&self) -> &RenderOptions {
        self.renderer.options()
    }

    pub fn engine(&self) -> &Arc<E> {
        self.renderer.engine()
    }

    /// Configured source identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Configured path of a source.
    pub fn path_of(&self, identifier: &str) -> Option<&Path> {
        self.entries.get(identifier).map(PathBuf::as_path)
    }

    /// Return the source for `identifier`, opening `path` on first use.
    ///
    /// Each identifier is opened at most once, even under concurrent first
    /// requests; an invalid result is kept like a ready one.
    pub async fn get_or_open_source(
        &self,
        identifier: &str,
        path: &Path,
    ) -> Result<Arc<RasterSource<E::Dataset>>, TileError> {
        let cell = self
            .sources
            .entry(identifier.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .value()
            .clone();

        let source = cell
            .get_or_try_init(|| async {
                let engine = Arc::clone(self.renderer.engine());
                let id = identifier.to_string();
                let path = path.to_path_buf();
                tokio::task::spawn_blocking(move || Arc::new(RasterSource::open(engine.as_ref(), id, path)))
                    .await
                    .map_err(|e| TileError::OpenFailure(format!("open task failed: {}", e)))
            })
            .await?;

        Ok(Arc::clone(source))
    }

    /// Resolve a configured source, opening it on first use.
    pub async fn source(&self, identifier: &str) -> Result<Arc<RasterSource<E::Dataset>>, TileError> {
        let path = self
            .entries
            .get(identifier)
            .ok_or_else(|| TileError::UnknownSource(identifier.to_string()))?;
        self.get_or_open_source(identifier, path).await
    }

    /// Return the encoded tile, rendering it at most once per key.
    ///
    /// Successful renders are memoized; failures are returned to every
    /// waiting caller and never stored.
    pub async fn get_tile(&self, identifier: &str, key: TileKey) -> Result<RenderedTile, TileError> {
        if let Some(tile) = self.rendered.get(identifier, &key).await {
            self.counters.hit();
            trace!(source = identifier, tile = %key, "Tile memo hit");
            return Ok(tile);
        }
        self.counters.miss();

        let result = self.render_through_memo(identifier, key).await;
        if result.is_err() {
            self.counters.failure();
        }
        result
    }

    /// Render under the memo's single flight.
    ///
    /// The flight runs as its own task, so a caller that is dropped or times
    /// out leaves it attached to the key; later callers join it instead of
    /// starting a second render.
    async fn render_through_memo(&self, identifier: &str, key: TileKey) -> Result<RenderedTile, TileError> {
        let source = self.source(identifier).await?;
        source.ready()?;

        let memo = self.rendered.clone();
        let renderer = Arc::clone(&self.renderer);
        let counters = Arc::clone(&self.counters);
        let id = identifier.to_string();

        let flight = tokio::spawn(async move {
            memo.get_or_render(&id, key, async move {
                counters.render();
                debug!(source = source.id(), tile = %key, "Rendering tile");
                run_blocking(None, move || renderer.render(&source, &key)).await
            })
            .await
        });

        let joined = match self.options().timeout {
            Some(limit) => tokio::time::timeout(limit, flight)
                .await
                .map_err(|_| timed_out(limit))?,
            None => flight.await,
        };
        joined
            .map_err(|e| TileError::RenderFailure(format!("render task failed: {}", e)))?
            .map_err(|e| (*e).clone())
    }

    /// Render a tile into a named file, bypassing the memo.
    pub async fn save_tile(&self, identifier: &str, key: TileKey, path: &Path) -> Result<(), TileError> {
        let source = self.source(identifier).await?;
        source.ready()?;

        let renderer = Arc::clone(&self.renderer);
        let path = path.to_path_buf();
        self.counters.render();

        let result = run_blocking(self.options().timeout, move || {
            renderer.render_to_file(&source, &key, &path)
        })
        .await;
        if result.is_err() {
            self.counters.failure();
        }
        result
    }

    /// Current statistics.
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            sources_configured: self.entries.len(),
            sources_open: self.sources.iter().filter(|cell| cell.initialized()).count(),
            tiles_cached: self.rendered.entry_count(),
            max_tiles: self.rendered.max_tiles(),
            ..Default::default()
        };
        self.counters.fill(&mut stats);
        stats
    }

    /// One summary per configured source.
    pub fn source_summaries(&self) -> Vec<SourceSummary> {
        self.entries
            .iter()
            .map(|(id, path)| {
                let opened = self
                    .sources
                    .get(id)
                    .and_then(|cell| cell.value().get().map(Arc::clone));
                SourceSummary {
                    id: id.clone(),
                    path: path.clone(),
                    status: opened.as_ref().map(|s| s.status().to_string()),
                    error: opened.as_ref().and_then(|s| s.error().map(TileError::message)),
                }
            })
            .collect()
    }

    /// Settle pending memo maintenance so counts are exact.
    pub async fn sync(&self) {
        self.rendered.sync().await;
    }
}

fn timed_out(limit: Duration) -> TileError {
    TileError::RenderFailure(format!("render timed out after {}ms", limit.as_millis()))
}

/// Run `f` on the blocking pool, bounded by `timeout`.
///
/// A timed-out render keeps running on its thread; its result is discarded.
async fn run_blocking<T, F>(timeout: Option<Duration>, f: F) -> Result<T, TileError>
where
    F: FnOnce() -> Result<T, TileError> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(f);
    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| timed_out(limit))?,
        None => task.await,
    };
    joined.map_err(|e| TileError::RenderFailure(format!("render task failed: {}", e)))?
}
