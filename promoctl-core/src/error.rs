//! Structured error types for promoctl-core.
//!
//! The CLI wraps these in `anyhow` with call-site context; library consumers
//! can match on the variants (e.g. to show the backend's message verbatim).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for promoctl-core operations
#[derive(Error, Debug)]
pub enum PromoError {
    /// The request never produced a response (connection refused, timeout, TLS)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// Base URL could not be used to build request URLs
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// I/O operation failed (config or token file)
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML or has the wrong shape
    #[error("invalid config {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for promoctl-core operations
pub type Result<T> = std::result::Result<T, PromoError>;

impl PromoError {
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn decode(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Message suitable for an alert or error banner.
    ///
    /// Backend errors show the backend's own message; everything else shows
    /// the full error text.
    pub fn user_message(&self) -> String {
        match self {
            PromoError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = PromoError::api(404, "Promotion not found");
        assert_eq!(err.to_string(), "Promotion not found (HTTP 404)");
        assert_eq!(err.user_message(), "Promotion not found");
    }

    #[test]
    fn test_config_error_display() {
        let err = PromoError::config("base_url is empty");
        assert_eq!(err.to_string(), "Configuration error: base_url is empty");
        assert_eq!(err.user_message(), err.to_string());
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = PromoError::io(
            "/tmp/admin-token",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/admin-token"));
    }
}
