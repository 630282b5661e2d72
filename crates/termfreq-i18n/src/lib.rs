//! # termfreq i18n
//!
//! Fluent localization for chart, table and session labels. English and
//! German resources are compiled into the binary; unsupported languages fall
//! back to English.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod error;
pub mod locale;
pub mod manager;
pub mod messages;
pub mod resource;

pub use bundle::BundleManager;
pub use error::{I18nError, I18nResult};
pub use locale::Locale;
pub use manager::I18nManager;
pub use messages::{InputField, Messages, TableHeadings, MESSAGE_IDS};

// Re-export commonly used Fluent types
pub use fluent_bundle::{FluentArgs, FluentValue};
