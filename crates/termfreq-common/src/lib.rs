//! # termfreq common
//!
//! Shared types, errors, logging and the search client used by every other
//! crate in the termfreq workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod scraper;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, TermFreqError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use scraper::{search_query, SearchClient, SearchClientConfig, SearchPage};
pub use types::*;
pub use utils::*;
