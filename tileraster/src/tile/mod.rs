//! Tile extraction pipeline.
//!
//! Turns a `(source, TileKey)` pair into an encoded tile: footprint check,
//! engine warp into the tile box, encode, and either return the bytes or
//! write a named file.

mod options;
mod rendered;
mod renderer;

pub use options::{RenderOptions, DEFAULT_RENDER_TIMEOUT, DEFAULT_TILE_SIZE};
pub use rendered::RenderedTile;
pub use renderer::{aux_sidecars, TileRenderer};
