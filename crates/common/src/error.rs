//! Error types for AutoDesign

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the AutoDesign error
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by strategy failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// AutoDesign error types
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any strategy work started
    #[error("Validation error: {0}")]
    Validation(String),

    /// A strategy could not finish extraction or recording
    #[error("{strategy} strategy failed: {source}")]
    Strategy {
        strategy: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Playwright not found. Install with: npm i -D playwright && npx playwright install chromium")]
    PlaywrightNotFound,

    #[error("Failed to write {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap any error as a failure of the named strategy
    pub fn strategy<E>(strategy: &'static str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Strategy {
            strategy,
            source: source.into(),
        }
    }

    /// Whether this error was raised by input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_error_wraps_message() {
        let err = Error::strategy("text", "file vanished");
        assert_eq!(err.to_string(), "text strategy failed: file vanished");
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_strategy_error_wraps_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::strategy("recording", io);
        assert!(err.to_string().contains("gone"));
    }
}
