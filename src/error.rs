//! Error types and handling for the flycast service

use thiserror::Error;

/// Main error type for the flycast service
#[derive(Error, Debug)]
pub enum FlycastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream weather API errors
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl FlycastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream API error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FlycastError::Config { .. } => {
                "Configuration error. Please check the config file and environment.".to_string()
            }
            FlycastError::Upstream { .. } => {
                "Unable to reach the upstream weather services. Please try again later."
                    .to_string()
            }
            FlycastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            FlycastError::Cache { .. } => {
                "Cache operation failed. You may need to clear the cache directory.".to_string()
            }
            FlycastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            FlycastError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = FlycastError::config("missing cron secret");
        assert!(matches!(config_err, FlycastError::Config { .. }));

        let upstream_err = FlycastError::upstream("connection failed");
        assert!(matches!(upstream_err, FlycastError::Upstream { .. }));

        let validation_err = FlycastError::validation("unknown location id");
        assert!(matches!(validation_err, FlycastError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = FlycastError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let upstream_err = FlycastError::upstream("test");
        assert!(upstream_err.user_message().contains("Unable to reach"));

        let validation_err = FlycastError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let flycast_err: FlycastError = io_err.into();
        assert!(matches!(flycast_err, FlycastError::Io { .. }));
    }
}
