//! # termfreq
//!
//! Command line front end: a one-shot `run` and an `interactive` session
//! over the fetch, shape, chart and export pipeline.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod display;
pub mod error;
pub mod session;

pub use app::{App, AppOptions};
pub use cli::{Cli, Command, OutputArgs, QueryArgs};
pub use error::{AppError, AppResult};
pub use session::{parse_command, Flow, Session, SessionCommand};
