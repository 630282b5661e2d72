//! Error types for internationalization operations

use termfreq_common::TermFreqError;
use thiserror::Error;

/// Errors that can occur during internationalization operations
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// Failed to parse a Fluent resource
    #[error("Failed to parse Fluent resource for {locale}: {errors:?}")]
    FluentParseError {
        /// Locale of the resource
        locale: String,
        /// Parser messages
        errors: Vec<String>,
    },

    /// Message not found in any bundle
    #[error("Message not found: {key}")]
    MessageNotFound {
        /// Message id
        key: String,
    },

    /// Failed to format a message
    #[error("Failed to format message '{key}': {errors:?}")]
    MessageFormatError {
        /// Message id
        key: String,
        /// Formatter messages
        errors: Vec<String>,
    },

    /// Adding a resource to a bundle failed
    #[error("Failed to create bundle for locale {locale}: {errors:?}")]
    BundleCreationError {
        /// Locale of the bundle
        locale: String,
        /// Bundle messages
        errors: Vec<String>,
    },
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;

impl From<I18nError> for TermFreqError {
    fn from(err: I18nError) -> Self {
        let locale = match &err {
            I18nError::FluentParseError { locale, .. } | I18nError::BundleCreationError { locale, .. } => {
                Some(locale.clone())
            }
            _ => None,
        };
        TermFreqError::Localization {
            message: err.to_string(),
            locale,
        }
    }
}
