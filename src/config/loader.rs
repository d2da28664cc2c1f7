//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::{ColumnDescriptor, ColumnName};
use crate::source::SourceOptions;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "SORTLIST_CONFIG";
/// Environment variable overriding the order file.
pub const ENV_ORDER_FILE: &str = "SORTLIST_ORDER_FILE";
/// Environment variable overriding the default sort column.
pub const ENV_SORT_COLUMN: &str = "SORTLIST_SORT_COLUMN";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A `[[columns]]` entry has an empty name.
    #[error("Column entry {index} has an empty name")]
    EmptyColumnName {
        /// Position of the entry in the file.
        index: usize,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/sortlist/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Column the header starts on.
    #[serde(default)]
    pub default_sort_column: Option<String>,

    /// Where the committed order is saved.
    #[serde(default)]
    pub order_file: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Record field holding the row id.
    #[serde(default)]
    pub id_field: Option<String>,

    /// Record field holding the row tags.
    #[serde(default)]
    pub tags_field: Option<String>,

    /// Explicit column list; inferred from the data when absent.
    #[serde(default)]
    pub columns: Option<Vec<ColumnConfig>>,
}

/// One `[[columns]]` table.
///
/// ```toml
/// [[columns]]
/// name = "size"
/// width = 8
/// numeric = true
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    /// Record field and header label.
    pub name: String,

    /// Width in terminal cells.
    #[serde(default)]
    pub width: Option<u16>,

    /// Compare numerically.
    #[serde(default)]
    pub numeric: Option<bool>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Column the header starts on; `None` means the first column.
    pub default_sort_column: Option<String>,
    /// Saved order file.
    pub order_file: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Record id field.
    pub id_field: String,
    /// Record tags field.
    pub tags_field: String,
    /// Configured columns (may be empty).
    pub columns: Vec<ColumnConfig>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            default_sort_column: None,
            order_file: default_order_path(),
            log_file_path: default_log_path(),
            id_field: "id".to_string(),
            tags_field: "tags".to_string(),
            columns: Vec::new(),
        }
    }
}

impl ResolvedConfig {
    /// Row source options for this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyColumnName` for a nameless column entry.
    pub fn source_options(&self) -> Result<SourceOptions, ConfigError> {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let name = ColumnName::new(column.name.as_str())
                    .map_err(|_| ConfigError::EmptyColumnName { index })?;
                let descriptor = if column.numeric.unwrap_or(false) {
                    ColumnDescriptor::numeric(name)
                } else {
                    ColumnDescriptor::text(name)
                };
                Ok(match column.width {
                    Some(width) => descriptor.with_width(width),
                    None => descriptor,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(SourceOptions {
            id_field: self.id_field.clone(),
            tags_field: self.tags_field.clone(),
            columns,
        })
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/sortlist/sortlist.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("sortlist").join("sortlist.log"),
        None => PathBuf::from("sortlist.log"),
    }
}

/// Resolve default order file path.
///
/// Returns `~/.local/share/sortlist/order.json` on Linux; falls back to the
/// current directory when no data directory is known.
pub fn default_order_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("sortlist").join("order.json"),
        None => PathBuf::from("sortlist-order.json"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/sortlist/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sortlist").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SORTLIST_CONFIG` environment variable
/// 3. Default path `~/.config/sortlist/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        default_sort_column: config.default_sort_column.or(defaults.default_sort_column),
        order_file: config.order_file.unwrap_or(defaults.order_file),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        id_field: config.id_field.unwrap_or(defaults.id_field),
        tags_field: config.tags_field.unwrap_or(defaults.tags_field),
        columns: config.columns.unwrap_or(defaults.columns),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `SORTLIST_ORDER_FILE`: Override order file
/// - `SORTLIST_SORT_COLUMN`: Override default sort column
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(order_file) = std::env::var(ENV_ORDER_FILE) {
        config.order_file = PathBuf::from(order_file);
    }

    if let Ok(column) = std::env::var(ENV_SORT_COLUMN) {
        config.default_sort_column = Some(column);
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only flags the user actually passed are applied.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    order_file_override: Option<PathBuf>,
    sort_column_override: Option<String>,
) -> ResolvedConfig {
    if let Some(order_file) = order_file_override {
        config.order_file = order_file;
    }

    if let Some(column) = sort_column_override {
        config.default_sort_column = Some(column);
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
