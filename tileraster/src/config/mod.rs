//! Configuration file support.
//!
//! Settings live in an INI file, by default
//! `<config dir>/tileraster/config.ini`:
//!
//! ```ini
//! [server]
//! bind = 127.0.0.1:8080
//!
//! [render]
//! format = png
//! resample = bilinear
//! tile_size = 256
//! timeout_secs = 30
//!
//! [cache]
//! max_tiles = 1024
//!
//! [logging]
//! level = info
//! file = /var/log/tileraster/tileraster.log
//!
//! [catalog]
//! directory = /data/images
//!
//! [sources]
//! ac = ac.tif
//! ```
//!
//! Every section and key is optional; missing values take their defaults.

mod error;
mod file;
mod sections;

pub use error::ConfigError;
pub use file::{default_config_path, ConfigFile};
pub use sections::{
    CacheConfig, CatalogConfig, LoggingConfig, RenderConfig, ServerConfig, DEFAULT_BIND,
    DEFAULT_LOG_LEVEL,
};
