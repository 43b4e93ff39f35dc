//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/runlog/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base URL of the dashboard backend.
    #[serde(default)]
    pub server_url: Option<String>,

    /// Polling cadence in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,

    /// Rows materialized above/below the visible window.
    #[serde(default)]
    pub overscan: Option<usize>,

    /// Start with autoscroll (follow) enabled.
    #[serde(default)]
    pub follow: Option<bool>,

    /// Path to the file tracing output is written to.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Base URL of the dashboard backend.
    pub server_url: String,
    /// Polling cadence in milliseconds.
    pub poll_interval_ms: u64,
    /// Rows materialized above/below the visible window.
    pub overscan: usize,
    /// Start with autoscroll (follow) enabled.
    pub follow: bool,
    /// Path to the file tracing output is written to.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            poll_interval_ms: 5000,
            overscan: 8,
            follow: true,
            log_file_path: default_log_path(),
        }
    }
}

fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("runlog")
        .join("runlog.log")
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("runlog").join("config.toml"))
}

/// Load the config file from the explicit path or the default location.
///
/// A missing file is not an error (`Ok(None)`): the defaults apply. A file
/// that exists but cannot be read or parsed is an error - silently ignoring
/// a broken config hides operator mistakes.
pub fn load_config_file(explicit: Option<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = match explicit.or_else(default_config_path) {
        Some(path) => path,
        None => return Ok(None),
    };
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    let parsed = toml::from_str(&raw).map_err(|e| ConfigError::ParseError {
        path,
        reason: e.to_string(),
    })?;
    Ok(Some(parsed))
}

/// Merge an optional config file over the defaults.
pub fn merge_config(file: Option<ConfigFile>) -> ResolvedConfig {
    let mut config = ResolvedConfig::default();
    let Some(file) = file else {
        return config;
    };
    if let Some(server_url) = file.server_url {
        config.server_url = server_url;
    }
    if let Some(poll_interval_ms) = file.poll_interval_ms {
        config.poll_interval_ms = poll_interval_ms;
    }
    if let Some(overscan) = file.overscan {
        config.overscan = overscan;
    }
    if let Some(follow) = file.follow {
        config.follow = follow;
    }
    if let Some(log_file_path) = file.log_file_path {
        config.log_file_path = log_file_path;
    }
    config
}

/// Apply `RUNLOG_*` environment variable overrides.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(server_url) = std::env::var("RUNLOG_SERVER_URL") {
        config.server_url = server_url;
    }
    if let Ok(raw) = std::env::var("RUNLOG_POLL_INTERVAL_MS") {
        match raw.parse() {
            Ok(ms) => config.poll_interval_ms = ms,
            Err(_) => warn!(%raw, "ignoring unparsable RUNLOG_POLL_INTERVAL_MS"),
        }
    }
    if let Ok(raw) = std::env::var("RUNLOG_FOLLOW") {
        match raw.parse() {
            Ok(follow) => config.follow = follow,
            Err(_) => warn!(%raw, "ignoring unparsable RUNLOG_FOLLOW"),
        }
    }
    if let Ok(path) = std::env::var("RUNLOG_LOG_FILE") {
        config.log_file_path = PathBuf::from(path);
    }
    config
}

/// CLI argument overrides (the last word in the precedence chain).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// `--server` value, if given.
    pub server_url: Option<String>,
    /// `--follow` flag, if explicitly set.
    pub follow: Option<bool>,
}

/// Apply CLI overrides on top of everything else.
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(server_url) = cli.server_url {
        config.server_url = server_url;
    }
    if let Some(follow) = cli.follow {
        config.follow = follow;
    }
    config
}
