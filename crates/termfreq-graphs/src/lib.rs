//! # termfreq graphs
//!
//! The data side of termfreq: fetching posts under a retry policy,
//! memoizing fetches, shaping posts into per-day/month/year counts,
//! drawing the bar chart with plotters and exporting the raw posts as CSV.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod bar_chart;
pub mod cache;
pub mod data_fetcher;
pub mod export;
pub mod pipeline;
pub mod renderer;
pub mod types;

pub use aggregator::{calendar_skeleton, shape};
pub use bar_chart::BarChartRenderer;
pub use cache::{CacheMetrics, FetchCache};
pub use data_fetcher::{DataFetcher, FileSource, PostSource, RetryPolicy};
pub use export::{export_csv, read_csv, to_csv_string, write_csv, CSV_HEADER, CSV_MIME};
pub use pipeline::{Pipeline, PipelineOutput};
pub use renderer::{parse_color, ChartFormat, ChartLabels, ChartRenderer, ChartStyle};
pub use types::{ChartSeries, SeriesPoint, ShapedRow, ShapedTable};
