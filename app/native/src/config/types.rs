//! Configuration types and file loading.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::{EasingType, SpringParams};

// ============================================================================
// Root
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CasementConfig {
    /// Defaults applied to animation requests that do not set their own.
    pub animation: AnimationConfig,
    /// Shared animation clock settings.
    pub scheduler: SchedulerConfig,
}

// ============================================================================
// Animation
// ============================================================================

/// Animation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    /// Duration in milliseconds.
    pub duration_ms: u32,
    /// Easing curve.
    pub easing: EasingType,
    /// Spring tuning for the `spring-bounce` easing.
    pub spring: SpringParams,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            easing: EasingType::EaseOut,
            spring: SpringParams::default(),
        }
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Animation clock settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Time between clock ticks in milliseconds.
    pub period_ms: u32,
    /// Deltas above this many milliseconds are treated as a pause.
    pub max_delta_ms: u32,
    /// Delta reported in place of a pause, in milliseconds.
    pub nominal_frame_ms: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period_ms: 16,
            max_delta_ms: 100,
            nominal_frame_ms: 16,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/casement/config.jsonc, \
         the platform config directory, or ~/.casement.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".casement.jsonc", ".casement.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/casement/config.jsonc` or `config.json`, when set
/// 2. `~/.config/casement/config.jsonc` or `config.json`
/// 3. the platform config directory (`dirs::config_dir()`)
/// 4. `~/.casement.jsonc` or `~/.casement.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    fn push_dir(dir: &Path, paths: &mut Vec<PathBuf>) {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    let mut paths = Vec::new();

    if let Some(xdg_config) = std::env::var_os("XDG_CONFIG_HOME").filter(|value| !value.is_empty()) {
        push_dir(&PathBuf::from(xdg_config).join("casement"), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(&home.join(".config").join("casement"), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(&config_dir.join("casement"), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, or an IO or
/// parse error if it cannot be read.
pub fn load_config_from_path(path: &Path) -> Result<(CasementConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    Ok((parse_config_file(path)?, path.to_path_buf()))
}

/// Loads the configuration from the first existing search path.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists, or an IO
/// or parse error if the first one found cannot be read.
pub fn load_config() -> Result<(CasementConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return Ok((parse_config_file(&path)?, path));
        }
    }

    Err(ConfigError::NotFound)
}

fn parse_config_file(path: &Path) -> Result<CasementConfig, ConfigError> {
    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let mut config: CasementConfig = serde_json::from_reader(reader)?;
    config.animation.spring = config.animation.spring.clamped();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".jsonc").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = CasementConfig::default();
        assert_eq!(config.animation.duration_ms, 300);
        assert_eq!(config.animation.easing, EasingType::EaseOut);
        assert!((config.animation.spring.damping_ratio - 0.7).abs() < f64::EPSILON);
        assert!((config.animation.spring.stiffness - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.scheduler.period_ms, 16);
        assert_eq!(config.scheduler.max_delta_ms, 100);
        assert_eq!(config.scheduler.nominal_frame_ms, 16);
    }

    #[test]
    fn test_load_jsonc_with_comments_and_partial_keys() {
        let file = write_config(
            r#"{
                // Slower, bouncier animations
                "animation": {
                    "durationMs": 450,
                    "easing": "spring-bounce",
                    /* only one spring key set */
                    "spring": { "dampingRatio": 0.4 }
                }
            }"#,
        );

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(path, file.path());
        assert_eq!(config.animation.duration_ms, 450);
        assert_eq!(config.animation.easing, EasingType::SpringBounce);
        assert!((config.animation.spring.damping_ratio - 0.4).abs() < f64::EPSILON);
        assert!((config.animation.spring.stiffness - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.scheduler, SchedulerConfig::default());
    }

    #[test]
    fn test_load_clamps_spring_values() {
        let file = write_config(r#"{ "animation": { "spring": { "dampingRatio": 9, "stiffness": 1 } } }"#);
        let (config, _) = load_config_from_path(file.path()).unwrap();
        assert!((config.animation.spring.damping_ratio - 2.0).abs() < f64::EPSILON);
        assert!((config.animation.spring.stiffness - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from_path(&dir.path().join("missing.jsonc"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_invalid_json_is_parse_error() {
        let file = write_config(r#"{ "animation": { "durationMs": "slow" } }"#);
        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_paths_prefer_jsonc() {
        let paths = config_paths();
        assert!(!paths.is_empty() || dirs::home_dir().is_none());
        if let Some(first) = paths.first() {
            assert!(first.to_string_lossy().ends_with("config.jsonc"));
        }
    }

    #[test]
    fn test_config_error_messages() {
        assert!(ConfigError::NotFound.to_string().contains("No configuration file found"));
    }
}
