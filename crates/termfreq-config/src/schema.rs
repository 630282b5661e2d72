//! Configuration schema definitions using serde with validation attributes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use termfreq_common::{Granularity, LoggingConfig, SearchClientConfig};
use validator::Validate;

/// Main configuration structure for termfreq.
///
/// Every section is optional in the YAML file; missing sections and fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Where posts come from.
    #[validate]
    pub source: SourceConfig,
    /// Retry policy for acquisition.
    #[validate]
    pub retry: RetryConfig,
    /// Chart appearance and output file.
    #[validate]
    pub chart: ChartConfig,
    /// CSV export.
    #[validate]
    pub export: ExportConfig,
    /// Fetch memoization.
    #[validate]
    pub cache: CacheConfig,
    /// Inputs used when none are given on the command line.
    #[validate]
    pub defaults: QueryDefaults,
    /// Language of chart and table labels.
    #[validate(custom(
        function = "crate::validation::validate_language",
        message = "Language must look like 'en-US'"
    ))]
    pub language: String,
    /// Logging setup.
    pub logging: LoggingConfig,
}

/// Search endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the search service.
    #[validate(custom(
        function = "crate::validation::validate_http_url",
        message = "Source URL must be an http(s) URL"
    ))]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_secs: u64,
    /// Requests per second.
    #[validate(range(min = 1, max = 100, message = "Rate limit must be between 1 and 100 per second"))]
    pub rate_limit_per_sec: u32,
    /// Posts per page.
    #[validate(range(min = 1, max = 1000, message = "Page size must be between 1 and 1000"))]
    pub page_size: u32,
    /// Optional cap on pages per search.
    #[validate(range(min = 1, message = "Max pages must be at least 1"))]
    pub max_pages: Option<u32>,
    /// User agent header.
    #[validate(length(min = 1, message = "User agent cannot be empty"))]
    pub user_agent: String,
}

impl SourceConfig {
    /// Client settings for [`termfreq_common::SearchClient`].
    pub fn client_config(&self) -> SearchClientConfig {
        SearchClientConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            rate_limit_per_sec: self.rate_limit_per_sec,
            page_size: self.page_size,
            max_pages: self.max_pages,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Bounded retry policy for a whole fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(
    function = "crate::validation::validate_retry_delays",
    skip_on_field_errors = false
))]
pub struct RetryConfig {
    /// Total attempts, including the first.
    #[validate(range(min = 1, max = 20, message = "Max attempts must be between 1 and 20"))]
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    #[validate(range(min = 1, message = "Initial delay must be at least 1 ms"))]
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Randomize delays.
    pub jitter: bool,
}

impl RetryConfig {
    /// Upper bound for any single delay.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Bar chart settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartConfig {
    /// Width in pixels.
    #[validate(range(min = 200, max = 8000, message = "Width must be between 200 and 8000 pixels"))]
    pub width: u32,
    /// Height in pixels.
    #[validate(range(min = 150, max = 8000, message = "Height must be between 150 and 8000 pixels"))]
    pub height: u32,
    /// Bar fill color.
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Bar color must be a hex color like #1f77b4"
    ))]
    pub bar_color: String,
    /// Background color.
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Background color must be a hex color like #FFFFFF"
    ))]
    pub background_color: String,
    /// Title font size in points.
    #[validate(range(min = 6, max = 96, message = "Title font size must be between 6 and 96"))]
    pub title_font_size: u32,
    /// Axis label font size in points.
    #[validate(range(min = 6, max = 96, message = "Label font size must be between 6 and 96"))]
    pub label_font_size: u32,
    /// File name of the rendered chart inside the output directory.
    #[validate(custom(
        function = "crate::validation::validate_file_name",
        message = "Chart file name must be a plain file name"
    ))]
    pub file_name: String,
}

/// CSV export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving the chart and the CSV file.
    pub output_dir: PathBuf,
    /// File name of the raw post export.
    #[validate(custom(
        function = "crate::validation::validate_file_name",
        message = "CSV file name must be a plain file name"
    ))]
    pub csv_file_name: String,
}

impl ExportConfig {
    /// Full path of the CSV export.
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_file_name)
    }
}

/// Fetch memoization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CacheConfig {
    /// Distinct fetches kept in memory.
    #[validate(range(min = 1, message = "Cache capacity must be at least 1"))]
    pub max_capacity: u64,
    /// Lifetime of a cached fetch in seconds.
    #[validate(range(min = 1, message = "Cache TTL must be at least 1 second"))]
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Lifetime of a cached fetch.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Inputs used when the command line leaves them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "crate::validation::validate_query_window"))]
pub struct QueryDefaults {
    /// Search term(s).
    pub term: String,
    /// First day of the window.
    pub date_since: NaiveDate,
    /// Last day of the window; `None` means today.
    pub date_until: Option<NaiveDate>,
    /// Bucket size.
    pub granularity: Granularity,
}
