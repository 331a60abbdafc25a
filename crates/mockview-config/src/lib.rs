//! mockview configuration system.
//!
//! Provides TOML-based defaults for the headless backend, script runtime
//! limits, and logging. All sections use sensible defaults so partial
//! configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mockview_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BackendDefaults, LogLevel, LoggingConfig, MockviewConfig, RuntimeConfig,
    CONFIG_SCHEMA_VERSION,
};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};

use mockview_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<MockviewConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &MockviewConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
