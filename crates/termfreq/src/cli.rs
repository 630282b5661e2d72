//! Command line arguments

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use termfreq_common::Granularity;
use termfreq_graphs::ChartFormat;

/// Term frequency charts for social media posts over a date range
#[derive(Parser, Debug)]
#[command(name = "termfreq", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TERMFREQ_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configuration
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Message language (en-US, de-DE), overrides the configuration
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// What to do
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one query: print the table, write the chart and the CSV export
    Run {
        /// Query inputs
        #[command(flatten)]
        query: QueryArgs,

        /// Output choices
        #[command(flatten)]
        output: OutputArgs,

        /// Do not print the post table
        #[arg(long)]
        no_table: bool,

        /// Do not write the CSV export
        #[arg(long)]
        no_export: bool,
    },

    /// Start a line-oriented session that re-runs the query as inputs change
    Interactive {
        /// Initial query inputs
        #[command(flatten)]
        query: QueryArgs,

        /// Output choices
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Query inputs; anything left out comes from the configured defaults
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    /// Search term(s)
    #[arg(short, long)]
    pub term: Option<String>,

    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Bucket size: day, month or year
    #[arg(short, long)]
    pub granularity: Option<Granularity>,
}

/// Where results go and where posts come from
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputArgs {
    /// Directory for the chart and the CSV export
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Replay a saved search result instead of querying the search endpoint
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    /// Chart file format
    #[arg(long, value_enum, default_value_t = FormatArg::Png)]
    pub format: FormatArg,

    /// Do not draw the chart
    #[arg(long)]
    pub no_chart: bool,
}

/// Chart file format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// PNG image
    #[default]
    Png,
    /// SVG image
    Svg,
}

impl From<FormatArg> for ChartFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Png => Self::Png,
            FormatArg::Svg => Self::Svg,
        }
    }
}
