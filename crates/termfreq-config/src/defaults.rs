//! Default values for every configuration section.

use crate::schema::*;
use chrono::NaiveDate;
use std::path::PathBuf;
use termfreq_common::{Granularity, LoggingConfig, SearchClientConfig};

/// Term searched when none is given.
pub const DEFAULT_TERM: &str = "Soziale Republik";

/// File name of the raw post export.
pub const DEFAULT_CSV_FILE_NAME: &str = "tweets_df.csv";

/// File name of the rendered chart.
pub const DEFAULT_CHART_FILE_NAME: &str = "term_frequency.png";

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// First day searched when none is given.
pub fn default_date_since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            retry: RetryConfig::default(),
            chart: ChartConfig::default(),
            export: ExportConfig::default(),
            cache: CacheConfig::default(),
            defaults: QueryDefaults::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        let client = SearchClientConfig::default();
        Self {
            base_url: client.base_url,
            timeout_secs: client.timeout_secs,
            rate_limit_per_sec: client.rate_limit_per_sec,
            page_size: client.page_size,
            max_pages: client.max_pages,
            user_agent: client.user_agent,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 10_000,
            jitter: true,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 400,
            bar_color: "#1f77b4".to_string(),
            background_color: "#FFFFFF".to_string(),
            title_font_size: 20,
            label_font_size: 13,
            file_name: DEFAULT_CHART_FILE_NAME.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            csv_file_name: DEFAULT_CSV_FILE_NAME.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 64,
            ttl_secs: 900,
        }
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            term: DEFAULT_TERM.to_string(),
            date_since: default_date_since(),
            date_until: None,
            granularity: Granularity::Month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.defaults.term, "Soziale Republik");
        assert_eq!(config.defaults.date_since.to_string(), "2021-01-01");
        assert_eq!(config.defaults.granularity, Granularity::Month);
        assert_eq!(config.export.csv_file_name, "tweets_df.csv");
        assert_eq!(config.export.csv_path(), PathBuf::from("./tweets_df.csv"));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.language, "en-US");
    }

    #[test]
    fn test_source_defaults_match_client_defaults() {
        let source = SourceConfig::default();
        let client = SearchClientConfig::default();
        assert_eq!(source.client_config().base_url, client.base_url);
        assert_eq!(source.client_config().page_size, client.page_size);
    }
}
