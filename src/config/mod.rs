//! Configuration module.
//!
//! Settings resolve with the precedence chain
//! Defaults → Config File → Environment → CLI, applied in that order by
//! [`loader`]. The polling cadence is configuration, not a runtime control:
//! it is fixed for the lifetime of the process.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, load_config_file, merge_config, CliOverrides,
    ConfigError, ConfigFile, ResolvedConfig,
};
