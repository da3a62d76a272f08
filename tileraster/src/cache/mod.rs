//! Tile catalog and rendered-tile memoization.
//!
//! The catalog owns every open source (never evicted) and a bounded LRU of
//! encoded tiles. Concurrent requests for the same `(source, tile)` pair
//! share one render; requests for different pairs render in parallel.

mod catalog;
mod memo;
mod stats;

pub use catalog::{SourceSummary, TileCatalog};
pub use memo::{RenderedTileCache, DEFAULT_MAX_TILES};
pub use stats::CatalogStats;
