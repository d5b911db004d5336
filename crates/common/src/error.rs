//! Error types shared across Rallytrace crates.

use std::path::PathBuf;

/// Top-level error type for Rallytrace operations.
#[derive(Debug, thiserror::Error)]
pub enum RallyError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using RallyError.
pub type RallyResult<T> = Result<T, RallyError>;

impl RallyError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        assert_eq!(
            RallyError::config("midline must be in (0, 1)").to_string(),
            "Configuration error: midline must be in (0, 1)"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let rally: RallyError = err.into();
        assert!(matches!(rally, RallyError::Json(_)));
    }
}
