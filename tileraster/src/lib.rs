//! tileraster - slippy-map tiles cut on demand from georeferenced rasters
//!
//! This library provides the core of a raster tile server: tile addressing
//! (`z/x/y` and quadkeys), footprint tests against a source image, the tile
//! extraction pipeline and a concurrency-safe tile catalog.
//!
//! Pixel work (opening, warping, encoding) goes through the
//! [`engine::RasterEngine`] trait; [`engine::ImageEngine`] is the bundled
//! pure-Rust implementation.

pub mod cache;
pub mod config;
pub mod coord;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod logging;
#[cfg(feature = "server")]
pub mod server;
pub mod source;
pub mod tile;

pub use cache::{CatalogStats, TileCatalog};
pub use coord::TileKey;
pub use error::{ErrorKind, TileError};
