//! Configuration for the task list.
//!
//! Values are layered with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/tasks/config.toml`)
//! 4. Compiled defaults
//!
//! A missing default config file is not an error. An explicit `--config`
//! path that doesn't exist is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

/// Top-level TOML config file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    tasks: TasksFileConfig,
    log: LogFileConfig,
    ui: UiFileConfig,
}

/// `[tasks]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TasksFileConfig {
    seed_file: Option<PathBuf>,
    demo_tasks: Option<bool>,
}

/// `[log]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LogFileConfig {
    level: Option<String>,
    file: Option<PathBuf>,
}

/// `[ui]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file the initial task list is read from.
    pub seed_file: Option<PathBuf>,
    /// Start with the starter tasks when no seed file is given.
    pub demo_tasks: bool,
    /// Default `tracing` filter; `RUST_LOG` wins when set.
    pub log_level: String,
    /// Log file path. `None` uses the platform data directory.
    pub log_file: Option<PathBuf>,
    /// How long the TUI waits for a key before redrawing.
    pub poll_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_file: None,
            demo_tasks: true,
            log_level: "info".to_string(),
            log_file: None,
            poll_timeout: Duration::from_millis(50),
        }
    }
}

impl Config {
    /// Resolve configuration from the CLI arguments and the config file.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => Some(read_config_file(path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(read_config_file(&path)?),
                _ => None,
            },
        };
        let mut config = Self::from_file(file.unwrap_or_default());

        if let Some(seed) = &cli.seed {
            config.seed_file = Some(seed.clone());
        }
        if cli.empty {
            config.demo_tasks = false;
        }
        if let Some(level) = &cli.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }

    /// Parse a TOML document on top of the defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            seed_file: file.tasks.seed_file,
            demo_tasks: file.tasks.demo_tasks.unwrap_or(defaults.demo_tasks),
            log_level: file.log.level.unwrap_or(defaults.log_level),
            log_file: file.log.file,
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
        }
    }

    /// Log file to write to, falling back to `<data dir>/tasks/tasks.log`.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join("tasks").join("tasks.log")))
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}

/// `~/.config/tasks/config.toml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tasks").join("config.toml"))
}
