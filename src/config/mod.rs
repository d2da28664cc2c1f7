//! Configuration module.
//!
//! Resolution order, lowest to highest: built-in defaults, the TOML config
//! file, `SORTLIST_*` environment variables, command-line flags.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    default_order_path, load_config_file, load_config_with_precedence, merge_config,
    ColumnConfig, ConfigError, ConfigFile, ResolvedConfig,
};
