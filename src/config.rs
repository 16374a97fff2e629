//! User configuration.
//!
//! Persisted as JSON at `<config dir>/sonora-tags/config.json`
//! (`~/.config/sonora-tags/config.json` on Linux). A missing file means defaults;
//! a file that exists but doesn't parse is an error, so typos aren't silently ignored.

use std::path::{Path, PathBuf};

use id3::Version;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported ID3 version {0:?} (expected \"2.3\" or \"2.4\")")]
    Id3Version(String),

    #[error("Unknown log level {0:?}")]
    LogLevel(String),
}

fn default_id3_version() -> String {
    "2.4".to_string()
}

fn default_custom_tag() -> String {
    "CUSTOM".to_string()
}

fn default_pattern() -> String {
    "[trackNumber] - [title]".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// ID3v2 version written on save: "2.3" or "2.4".
    #[serde(default = "default_id3_version")]
    pub id3_version: String,

    /// Tag key the `custom` field reads and writes.
    #[serde(default = "default_custom_tag")]
    pub custom_tag: String,

    /// Pattern `guess` uses when none is given.
    #[serde(default = "default_pattern")]
    pub default_pattern: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id3_version: default_id3_version(),
            custom_tag: default_custom_tag(),
            default_pattern: default_pattern(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    const CONFIG_FILE: &'static str = "config.json";

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join("sonora-tags").join(Self::CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;

        // Surface bad values at load time rather than on first save.
        config.id3_version()?;
        config.log_level()?;

        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(write_err)?;

        log::debug!("saved config to {}", path.display());
        Ok(())
    }

    pub fn id3_version(&self) -> Result<Version, ConfigError> {
        match self.id3_version.trim() {
            "2.3" | "3" | "v2.3" => Ok(Version::Id3v23),
            "2.4" | "4" | "v2.4" => Ok(Version::Id3v24),
            other => Err(ConfigError::Id3Version(other.to_string())),
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("none.json"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.id3_version().unwrap(), Version::Id3v24);
        assert_eq!(config.log_level().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "id3_version": "2.3", "custom_tag": "GROUPING" }"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.id3_version().unwrap(), Version::Id3v23);
        assert_eq!(config.custom_tag, "GROUPING");
        assert_eq!(config.default_pattern, "[trackNumber] - [title]");
    }

    #[test]
    fn bad_values_are_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(ConfigError::Parse { .. })));

        std::fs::write(&path, r#"{ "id3_version": "1.1" }"#).unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(ConfigError::Id3Version(_))));

        std::fs::write(&path, r#"{ "log_level": "loud" }"#).unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(ConfigError::LogLevel(_))));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            log_level: "debug".to_string(),
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }
}
