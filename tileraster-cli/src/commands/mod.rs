//! CLI subcommands.

pub mod common;
pub mod info;
pub mod quadkey;
pub mod seed;
pub mod serve;
pub mod tile;
