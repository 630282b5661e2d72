//! Integration tests for termfreq-config crate.

use std::io::Write;
use termfreq_common::Granularity;
use termfreq_config::{Config, ConfigError, ConfigLoader};
use validator::Validate;

#[test]
fn test_default_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.chart.background_color = "white".to_string();
    assert!(config.validate().is_err());

    config.chart.background_color = "#FAFAFA".to_string();
    config.retry.max_attempts = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_search_client_settings_follow_source_section() {
    let mut config = Config::default();
    config.source.base_url = "https://search.example.com".to_string();
    config.source.max_pages = Some(4);

    let client = config.source.client_config();
    assert_eq!(client.base_url, "https://search.example.com");
    assert_eq!(client.max_pages, Some(4));
}

#[test]
fn test_config_file_round_trip() {
    let mut config = Config::default();
    config.defaults.term = "Grundeinkommen".to_string();
    config.defaults.granularity = Granularity::Year;
    config.cache.ttl_secs = 60;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_yaml::to_string(&config).unwrap().as_bytes())
        .unwrap();

    let loaded = ConfigLoader::load_config_with(file.path(), |_| None).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_inverted_default_window_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"defaults:\n  date_since: 2022-01-01\n  date_until: 2021-01-01\n")
        .unwrap();

    let result = ConfigLoader::load_config_with(file.path(), |_| None);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

mod property_based_tests {
    use proptest::prelude::*;
    use termfreq_config::{validate_file_name, validate_language, HEX_COLOR_REGEX};

    proptest! {
        #[test]
        fn hex_colors_accepted(color in "#[0-9a-fA-F]{6}") {
            prop_assert!(HEX_COLOR_REGEX.is_match(&color));
        }

        #[test]
        fn file_names_with_separators_rejected(stem in "[a-z]{1,10}", ext in "[a-z]{1,4}") {
            let flat = format!("{stem}.{ext}");
            let nested = format!("{stem}/{flat}");
            prop_assert!(validate_file_name(&flat).is_ok());
            prop_assert!(validate_file_name(&nested).is_err());
        }

        #[test]
        fn region_tags_accepted(language in "[a-z]{2}", region in "[A-Z]{2}") {
            let tag = format!("{language}-{region}");
            prop_assert!(validate_language(&tag).is_ok());
        }
    }
}
