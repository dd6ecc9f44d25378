//! Server configuration.
//!
//! Settings are resolved in three layers, later ones winning:
//! built-in defaults, an optional JSON config file, then command line flags.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ASSETS_DIR, DEFAULT_BIND, DEFAULT_IMAGES_DIR, DEFAULT_LABELS_DIR,
    DEFAULT_TEMPLATES_DIR,
};

/// Log level setting for the server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Command line arguments.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON config file; flags given here override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Folder with the images to label (*.jpg, *.jpeg, *.png)
    #[arg(long, value_name = "DIR")]
    pub images: Option<PathBuf>,

    /// Folder for the per-image label files, created if missing
    #[arg(long, value_name = "DIR")]
    pub labels: Option<PathBuf>,

    /// Folder served under /assets
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Folder holding labeling.html
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Log verbosity (RUST_LOG overrides)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    #[serde(default = "default_labels_dir")]
    pub labels_dir: PathBuf,

    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    #[serde(default = "default_bind")]
    pub bind: String,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_images_dir() -> PathBuf {
    PathBuf::from(DEFAULT_IMAGES_DIR)
}

fn default_labels_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LABELS_DIR)
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ASSETS_DIR)
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATES_DIR)
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            images_dir: default_images_dir(),
            labels_dir: default_labels_dir(),
            assets_dir: default_assets_dir(),
            templates_dir: default_templates_dir(),
            bind: default_bind(),
            log_level: LogLevel::default(),
        }
    }
}

impl ServerConfig {
    /// Resolve defaults, the `--config` file if any, and the remaining flags.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Override fields with any flags given on the command line.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(dir) = &args.images {
            self.images_dir = dir.clone();
        }
        if let Some(dir) = &args.labels {
            self.labels_dir = dir.clone();
        }
        if let Some(dir) = &args.assets {
            self.assets_dir = dir.clone();
        }
        if let Some(dir) = &args.templates {
            self.templates_dir = dir.clone();
        }
        if let Some(bind) = &args.bind {
            self.bind = bind.clone();
        }
        if let Some(level) = args.log_level {
            self.log_level = level;
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::resolve(&Args::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.images_dir, PathBuf::from("assets/images"));
        assert_eq!(config.labels_dir, PathBuf::from("assets/labels"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            ServerConfig::from_json(r#"{"labels_dir": "out/labels", "log_level": "debug"}"#)
                .unwrap();
        assert_eq!(config.labels_dir, PathBuf::from("out/labels"));
        assert_eq!(config.images_dir, PathBuf::from("assets/images"));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ServerConfig {
            bind: "0.0.0.0:8080".into(),
            ..ServerConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(ServerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_newer_version() {
        let result = ServerConfig::from_json(r#"{"version": 99}"#);
        assert!(matches!(
            result,
            Err(ConfigError::VersionTooNew {
                file_version: 99,
                ..
            })
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxmark.json");
        std::fs::write(&path, r#"{"images_dir": "from/file", "bind": "0.0.0.0:1"}"#).unwrap();

        let args = Args::parse_from([
            "boxmark",
            "--config",
            path.to_str().unwrap(),
            "--bind",
            "127.0.0.1:9000",
            "--log-level",
            "warn",
        ]);
        let config = ServerConfig::resolve(&args).unwrap();
        assert_eq!(config.images_dir, PathBuf::from("from/file"));
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..Args::default()
        };
        assert!(matches!(
            ServerConfig::resolve(&args),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
        assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    }
}
