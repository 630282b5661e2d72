//! Validation utilities and regex patterns

use crate::schema::{QueryDefaults, RetryConfig};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #1f77b4)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Language tags of the form `en` or `en-US`
pub static LANGUAGE_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Z]{2})?$").expect("Invalid language tag regex pattern")
});

/// Validate that a URL parses and uses http or https
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("empty_url"));
    }

    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(ValidationError::new("unsupported_url_scheme")),
        Err(_) => Err(ValidationError::new("invalid_url")),
    }
}

/// Validate a language tag
pub fn validate_language(value: &str) -> Result<(), ValidationError> {
    if LANGUAGE_TAG_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_language_tag"))
    }
}

/// Validate a bare file name (no directories, no characters most filesystems reject)
pub fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("empty_file_name"));
    }

    let invalid_chars = ['/', '\\', '<', '>', '"', '|', '?', '*', ':'];
    if name.chars().any(|c| invalid_chars.contains(&c)) || name == "." || name == ".." {
        return Err(ValidationError::new("invalid_file_name"));
    }

    Ok(())
}

/// The first retry delay may not exceed the cap
pub fn validate_retry_delays(retry: &RetryConfig) -> Result<(), ValidationError> {
    if retry.initial_delay_ms > retry.max_delay_ms {
        let mut err = ValidationError::new("initial_delay_exceeds_max_delay");
        err.message = Some("initial_delay_ms must not exceed max_delay_ms".into());
        return Err(err);
    }
    Ok(())
}

/// A configured end date may not precede the start date
pub fn validate_query_window(defaults: &QueryDefaults) -> Result<(), ValidationError> {
    match defaults.date_until {
        Some(until) if until < defaults.date_since => {
            let mut err = ValidationError::new("date_until_before_date_since");
            err.message = Some("defaults.date_until must not precede defaults.date_since".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
