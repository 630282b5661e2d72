//! Error types and utilities for termfreq

use thiserror::Error;

/// Result type alias for termfreq operations
pub type Result<T> = std::result::Result<T, TermFreqError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for termfreq operations
#[derive(Error, Debug)]
pub enum TermFreqError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network level failures (connect, timeout, broken body stream)
    #[error("Network error: {message}")]
    Network {
        /// What went wrong
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedSource>,
    },

    /// The search endpoint answered, but not with something usable
    #[error("Upstream error: {message}")]
    Upstream {
        /// What went wrong
        message: String,
        /// HTTP status, when the endpoint sent one
        status_code: Option<u16>,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedSource>,
    },

    /// Acquisition gave up after the configured number of attempts
    #[error("Fetch failed after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        /// Attempts made, including the first
        attempts: u32,
        /// Failure of the last attempt
        #[source]
        source: Box<TermFreqError>,
    },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export or parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Chart rendering errors
    #[error("Chart error: {message}")]
    Chart {
        /// What went wrong
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedSource>,
    },

    /// Localization errors
    #[error("Localization error: {message}")]
    Localization {
        /// What went wrong
        message: String,
        /// Locale involved, if known
        locale: Option<String>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        /// What is wrong with the value
        message: String,
        /// Name of the offending input
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// What went wrong
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedSource>,
    },
}

impl TermFreqError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new upstream error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new upstream error carrying the HTTP status
    pub fn upstream_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Upstream {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new chart error
    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new chart error with source
    pub fn chart_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Chart {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether a fresh attempt at the same fetch could plausibly succeed.
    ///
    /// Network failures, server errors and rate limiting (429) are transient;
    /// other client errors and malformed payloads are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Upstream { status_code, .. } => match status_code {
                Some(429) => true,
                Some(code) => *code >= 500,
                None => false,
            },
            _ => false,
        }
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to TermFreqError
impl From<reqwest::Error> for TermFreqError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if let Some(status) = err.status() {
            Self::Upstream {
                message: format!("HTTP error: {}", status.as_u16()),
                status_code: Some(status.as_u16()),
                source: Some(Box::new(err)),
            }
        } else if err.is_decode() {
            Self::Upstream {
                message: "Malformed response body".to_string(),
                status_code: None,
                source: Some(Box::new(err)),
            }
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

/// Convert from serde_yaml::Error to TermFreqError
impl From<serde_yaml::Error> for TermFreqError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to TermFreqError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for TermFreqError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::chart_with_source("Chart rendering failed", err)
    }
}
