//! Test utilities and shared test helpers for termfreq.
//!
//! Fixtures here are shared by the unit and integration tests of every
//! crate in the workspace; enable the `testing` feature to use them from
//! another crate.

use crate::types::{Post, PostId};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a UTC timestamp.
pub fn mock_timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Shorthand for a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Post fixtures.
pub mod post_fixtures {
    use super::*;

    /// A post published at the given time with predictable text and author.
    pub fn post_at(id: u64, timestamp: DateTime<Utc>) -> Post {
        Post {
            timestamp,
            post_id: PostId::from(id),
            text: format!("post number {id} about the soziale republik"),
            author: format!("user{}", id % 3),
            hashtags: if id % 2 == 0 {
                Some(vec!["SozialeRepublik".to_string()])
            } else {
                None
            },
        }
    }

    /// A handful of posts spread over two years, deliberately out of order.
    pub fn sample_posts() -> Vec<Post> {
        vec![
            post_at(5, mock_timestamp(2021, 2, 1, 9, 0, 0)),
            post_at(1, mock_timestamp(2021, 1, 2, 23, 59, 59)),
            post_at(2, mock_timestamp(2021, 1, 2, 0, 0, 0)),
            post_at(3, mock_timestamp(2021, 1, 15, 12, 30, 0)),
            post_at(6, mock_timestamp(2022, 1, 1, 0, 0, 1)),
            post_at(4, mock_timestamp(2021, 1, 31, 18, 0, 0)),
        ]
    }

    /// Search-endpoint JSON for the given posts, as a single final page.
    pub fn page_json(posts: &[Post]) -> String {
        let wire: Vec<serde_json::Value> = posts
            .iter()
            .map(|post| {
                serde_json::json!({
                    "date": post.timestamp.to_rfc3339(),
                    "id": post.post_id.as_str(),
                    "content": post.text,
                    "user": {"username": post.author},
                    "hashtags": post.hashtags,
                })
            })
            .collect();
        serde_json::json!({ "posts": wire, "next_cursor": null }).to_string()
    }
}
