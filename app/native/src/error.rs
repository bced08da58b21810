//! Error types for Casement.
//!
//! The geometry, animation and fullscreen core never fails; it degrades to
//! documented fallbacks. These errors cover the surfaces around it:
//! configuration loading and the diagnostic CLI.

use thiserror::Error;

use crate::animation::ParseEasingError;
use crate::config::ConfigError;

/// Errors that can occur outside the geometry core.
#[derive(Debug, Error)]
pub enum CasementError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Unknown easing name.
    #[error(transparent)]
    Easing(#[from] ParseEasingError),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<String> for CasementError {
    fn from(msg: String) -> Self { Self::InvalidArguments(msg) }
}

impl From<&str> for CasementError {
    fn from(msg: &str) -> Self { Self::InvalidArguments(msg.to_string()) }
}

/// Result alias used by the fallible surfaces of the crate.
pub type CasementResult<T> = Result<T, CasementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_display() {
        let err = CasementError::from("expected 2 values for position, got 3");
        assert_eq!(err.to_string(), "expected 2 values for position, got 3");
    }

    #[test]
    fn test_config_error_display() {
        let err = CasementError::from(ConfigError::NotFound);
        assert!(err.to_string().starts_with("Configuration error: No configuration file found"));
    }

    #[test]
    fn test_easing_error_is_transparent() {
        let err: CasementError = "wobble".parse::<crate::animation::EasingType>().unwrap_err().into();
        assert_eq!(err.to_string(), "unknown easing 'wobble'");
    }

    #[test]
    fn test_io_error_conversion() {
        let err = CasementError::from(std::io::Error::other("disk gone"));
        assert!(matches!(err, CasementError::Io(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
