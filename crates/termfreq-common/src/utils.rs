//! Shared utility functions.

use crate::error::{Result, TermFreqError};
use chrono::NaiveDate;

/// Parses a `YYYY-MM-DD` date, naming the offending field on failure.
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        TermFreqError::validation_field(
            format!("'{}' is not a YYYY-MM-DD date: {}", value.trim(), e),
            field,
        )
    })
}

/// Collapses line breaks and tabs so a value fits on one table row.
pub fn single_line(input: &str) -> String {
    input
        .split(['\n', '\r', '\t'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2021-01-01 ", "date_since").unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );

        let err = parse_date("01.01.2021", "date_since").unwrap_err();
        assert!(matches!(
            err,
            TermFreqError::Validation { field: Some(ref f), .. } if f == "date_since"
        ));
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("first\nsecond\r\n\tthird"), "first second third");
    }

    #[test]
    fn test_truncate_string() {
        let truncated = truncate_string("This is a very long string that should be truncated", 20);
        assert_eq!(truncated, "This is a very lo...");
        assert_eq!(truncate_string("Short", 20), "Short");
    }

    #[test]
    fn test_truncate_string_is_char_safe() {
        assert_eq!(truncate_string("Grüße aus München", 8), "Grüße...");
    }
}
