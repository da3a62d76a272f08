//! INI configuration file loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, ParseOption};
use tracing::debug;

use super::{
    CacheConfig, CatalogConfig, ConfigError, LoggingConfig, RenderConfig, ServerConfig,
};

/// Default configuration file location: `<config dir>/tileraster/config.ini`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tileraster").join("config.ini"))
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub server: ServerConfig,
    pub render: RenderConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
}

impl ConfigFile {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        debug!(path = %path.display(), sources = config.catalog.sources.len(), "Loaded configuration");
        Ok(config)
    }

    /// Load the file at [`default_config_path`], or defaults when it does
    /// not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let option = ParseOption {
            enabled_escape: false,
            ..Default::default()
        };
        let ini = Ini::load_from_str_opt(text, option).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut config = ConfigFile::default();

        if let Some(bind) = parse_value(&ini, "server", "bind", "expected host:port")? {
            config.server.bind = bind;
        }

        if let Some(format) = parse_value(&ini, "render", "format", "expected png or jpeg")? {
            config.render.format = format;
        }
        if let Some(resample) =
            parse_value(&ini, "render", "resample", "expected bilinear or nearest")?
        {
            config.render.resample = resample;
        }
        if let Some(tile_size) = parse_value::<u32>(&ini, "render", "tile_size", "expected a positive integer")? {
            if tile_size == 0 {
                return Err(ConfigError::invalid("render", "tile_size", "0", "expected a positive integer"));
            }
            config.render.tile_size = tile_size;
        }
        if let Some(timeout) = parse_value(&ini, "render", "timeout_secs", "expected seconds")? {
            config.render.timeout_secs = timeout;
        }

        if let Some(max_tiles) = parse_value(&ini, "cache", "max_tiles", "expected an integer")? {
            config.cache.max_tiles = max_tiles;
        }

        if let Some(level) = get(&ini, "logging", "level") {
            config.logging.level = level.to_string();
        }
        config.logging.file = get(&ini, "logging", "file").map(PathBuf::from);

        config.catalog.directory = get(&ini, "catalog", "directory").map(PathBuf::from);
        if let Some(sources) = ini.section(Some("sources")) {
            for (id, path) in sources.iter() {
                let path = strip_inline_comment(path);
                if path.is_empty() {
                    return Err(ConfigError::invalid("sources", id, path, "expected a file path"));
                }
                config.catalog.sources.insert(id.trim().to_string(), PathBuf::from(path));
            }
        }

        Ok(config)
    }
}

/// Drop a trailing `; comment` or `# comment`.
fn strip_inline_comment(value: &str) -> &str {
    let cut = value
        .char_indices()
        .find(|&(i, c)| (c == ';' || c == '#') && (i == 0 || value[..i].ends_with(char::is_whitespace)))
        .map(|(i, _)| i);
    cut.map_or(value, |i| &value[..i]).trim()
}

fn get<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.section(Some(section))
        .and_then(|props| props.get(key))
        .map(strip_inline_comment)
        .filter(|v| !v.is_empty())
}

fn parse_value<T: FromStr>(
    ini: &Ini,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigError> {
    get(ini, section, key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| ConfigError::invalid(section, key, raw, reason))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ResampleKind, TileFormat};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[server]
bind = 0.0.0.0:9000

[render]
format = jpeg          ; png | jpeg
resample = nearest
tile_size = 512
timeout_secs = 0

[cache]
max_tiles = 64

[logging]
level = tileraster=debug,warn
file = /var/log/tileraster/tileraster.log

[catalog]
directory = /data/images

[sources]
ac = ac.tif
drone = /srv/drone.png   # absolute
"#;

    #[test]
    fn test_parse_full_file() {
        let config = ConfigFile::parse(SAMPLE).unwrap();
        assert_eq!(config.server.bind.to_string(), "0.0.0.0:9000");
        assert_eq!(config.render.format, TileFormat::Jpeg);
        assert_eq!(config.render.resample, ResampleKind::Nearest);
        assert_eq!(config.render.tile_size, 512);
        assert_eq!(config.render.timeout_secs, 0);
        assert_eq!(config.cache.max_tiles, 64);
        assert_eq!(config.logging.level, "tileraster=debug,warn");
        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("/var/log/tileraster/tileraster.log"))
        );
        assert_eq!(
            config.catalog.resolved_sources(),
            vec![
                ("ac".to_string(), PathBuf::from("/data/images/ac.tif")),
                ("drone".to_string(), PathBuf::from("/srv/drone.png")),
            ]
        );
    }

    #[test]
    fn test_empty_text_is_default() {
        assert_eq!(ConfigFile::parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = ConfigFile::parse("[render]\nformat = webp\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "format"));

        let err = ConfigFile::parse("[render]\ntile_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ConfigFile::parse("[server]\nbind = localhost\n").unwrap_err();
        assert!(err.to_string().contains("[server] bind"));
    }

    #[test]
    fn test_empty_source_path_rejected() {
        assert!(ConfigFile::parse("[sources]\nac =\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nmax_tiles = 10").unwrap();
        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.cache.max_tiles, 10);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigFile::load(Path::new("/nonexistent/tileraster.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_strip_inline_comment() {
        assert_eq!(strip_inline_comment("png ; comment"), "png");
        assert_eq!(strip_inline_comment("a#b"), "a#b");
        assert_eq!(strip_inline_comment("  value  "), "value");
    }
}
