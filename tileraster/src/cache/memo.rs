//! Rendered-tile memo using moka.
//!
//! Wraps `moka::future::Cache` with an LRU eviction policy bounded by entry
//! count. `try_get_with` gives single-flight semantics: concurrent callers
//! for one key wait on a single initializer and receive its result. Errors
//! are handed to every waiter and are never stored.

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache as MokaCache;
use moka::policy::EvictionPolicy;

use crate::coord::TileKey;
use crate::error::TileError;
use crate::tile::RenderedTile;

/// Default number of rendered tiles kept in memory.
pub const DEFAULT_MAX_TILES: u64 = 1024;

type MemoKey = (String, TileKey);

/// Bounded LRU of encoded tiles keyed by `(source identifier, tile)`.
///
/// Clones share the same storage.
#[derive(Clone)]
pub struct RenderedTileCache {
    cache: MokaCache<MemoKey, RenderedTile>,
    max_tiles: u64,
}

impl RenderedTileCache {
    /// Create a memo holding at most `max_tiles` tiles.
    pub fn new(max_tiles: u64) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(max_tiles)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { cache, max_tiles }
    }

    pub async fn get(&self, source: &str, key: &TileKey) -> Option<RenderedTile> {
        self.cache.get(&(source.to_string(), *key)).await
    }

    /// Return the memoized tile, or run `render` once for all concurrent
    /// callers of this key and store a successful result.
    pub async fn get_or_render<F>(
        &self,
        source: &str,
        key: TileKey,
        render: F,
    ) -> Result<RenderedTile, Arc<TileError>>
    where
        F: Future<Output = Result<RenderedTile, TileError>>,
    {
        self.cache.try_get_with((source.to_string(), key), render).await
    }

    pub fn contains(&self, source: &str, key: &TileKey) -> bool {
        self.cache.contains_key(&(source.to_string(), *key))
    }

    /// Number of memoized tiles (approximate until pending tasks ran).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn max_tiles(&self) -> u64 {
        self.max_tiles
    }

    /// Run pending eviction work.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// Drop every memoized tile.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
