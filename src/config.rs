//! Configuration loading and management
//!
//! Handles parsing of `config.toml` in the taskboard data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// JSON document on disk
    #[default]
    File,
    /// Process-local store, lost on exit
    Memory,
}

/// Storage-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Data file for the file backend; relative paths resolve against the
    /// data directory
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Seed the memory backend from the bundled fixtures
    #[serde(default = "default_true")]
    pub seed_fixtures: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from("board.json")
}

fn default_true() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: default_path(),
            seed_fixtures: default_true(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "off".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidConfig(format!("reading {}: {e}", path.display())))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults when it is
    /// missing or invalid. The load error comes back alongside the defaults
    /// so the caller can report it once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<Error>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Resolve the file backend's data path against `data_dir`.
    pub fn data_path(&self, data_dir: &Path) -> PathBuf {
        if self.storage.path.is_absolute() {
            self.storage.path.clone()
        } else {
            data_dir.join(&self.storage.path)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.storage.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("storage.path cannot be empty".into()));
        }
        if self.log.filter.trim().is_empty() {
            return Err(Error::InvalidConfig("log.filter cannot be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_or_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (cfg, err) = Config::load_or_default(&dir.path().join("config.toml"));
        assert!(err.is_none());
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.storage.backend, BackendKind::File);
        assert_eq!(cfg.log.filter, "off");
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let content = r#"
[storage]
backend = "memory"
seed_fixtures = false

[log]
filter = "taskboard=debug"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.storage.backend, BackendKind::Memory);
        assert!(!cfg.storage.seed_fixtures);
        assert_eq!(cfg.storage.path, PathBuf::from("board.json"));
        assert_eq!(cfg.log.filter, "taskboard=debug");
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage]\nbackend = \"cloud\"").expect("write config");

        assert!(matches!(Config::load(&path), Err(Error::TomlParse(_))));
        let (cfg, err) = Config::load_or_default(&path);
        assert_eq!(cfg, Config::default());
        assert!(matches!(err, Some(Error::TomlParse(_))));
    }

    #[test]
    fn empty_path_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage]\npath = \"\"").expect("write config");
        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn absolute_path_is_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage]\npath = \"/var/lib/board.json\"").expect("write config");
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.data_path(dir.path()), PathBuf::from("/var/lib/board.json"));
    }

    #[test]
    fn unreadable_config_is_an_invalid_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory in place of the file fails the read.
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("reading")));
        assert_eq!(err.exit_code(), crate::error::exit_codes::USER_ERROR);
    }

    #[test]
    fn relative_paths_resolve_against_data_dir() {
        let cfg = Config::default();
        assert_eq!(
            cfg.data_path(Path::new("/home/u/.taskboard")),
            PathBuf::from("/home/u/.taskboard/board.json")
        );
    }
}
