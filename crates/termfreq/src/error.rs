//! Application-wide error types using thiserror.

use termfreq_common::TermFreqError;
use termfreq_config::ConfigError;
use termfreq_i18n::I18nError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Fetching, shaping, rendering or exporting failed.
    #[error(transparent)]
    Core(#[from] TermFreqError),

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Localized messages could not be loaded.
    #[error("Localization error: {0}")]
    I18n(#[from] I18nError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A command or value typed by the user was not understood.
    #[error("{0}")]
    Input(String),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
