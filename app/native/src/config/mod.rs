//! Configuration module for Casement.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.
//! Every key is optional; missing keys take their defaults.

pub mod schema;
pub mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use schema::{generate_schema, generate_schema_json};
pub use types::{
    AnimationConfig, CasementConfig, ConfigError, SchedulerConfig, config_paths,
    load_config as load_config_default, load_config_from_path,
};

/// Global configuration instance, loaded once on first use.
static CONFIG: OnceLock<CasementConfig> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// Must be called before the first `get_config()` to take effect. Returns
/// `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Loads the configuration from disk, falling back to defaults.
fn load_or_default() -> CasementConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            CasementConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            CasementConfig::default()
        }
    }
}

/// Returns the global configuration instance, loading it on first use.
pub fn get_config() -> &'static CasementConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the path to the loaded configuration file, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

/// Returns the custom configuration path, if one was set.
pub fn get_custom_config_path() -> Option<&'static PathBuf> { CUSTOM_CONFIG_PATH.get() }
