//! Shaped data and chart series types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use termfreq_common::{Granularity, Post};

/// One row of the calendar/post left join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapedRow {
    /// Calendar day of the row
    pub date: NaiveDate,
    /// The matched post, `None` for a day without posts
    pub post: Option<Post>,
    /// `YYYY-MM` of `date`
    pub year_month: String,
    /// `YYYY` of `date`
    pub year: String,
    /// Posts on `date`
    pub count_days: u64,
    /// Posts in `year_month`
    pub count_months: u64,
    /// Posts in `year`
    pub count_years: u64,
}

impl ShapedRow {
    /// Bucket key of this row for a granularity
    pub fn key(&self, granularity: Granularity) -> String {
        match granularity {
            Granularity::Day => self.date.format("%Y-%m-%d").to_string(),
            Granularity::Month => self.year_month.clone(),
            Granularity::Year => self.year.clone(),
        }
    }

    /// Bucket count of this row for a granularity
    pub fn count(&self, granularity: Granularity) -> u64 {
        match granularity {
            Granularity::Day => self.count_days,
            Granularity::Month => self.count_months,
            Granularity::Year => self.count_years,
        }
    }
}

/// Calendar-ordered result of shaping a post collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapedTable {
    rows: Vec<ShapedRow>,
}

impl ShapedTable {
    pub(crate) fn from_rows(rows: Vec<ShapedRow>) -> Self {
        Self { rows }
    }

    /// All rows in calendar order
    pub fn rows(&self) -> &[ShapedRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows (only for an empty window)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that carry a post
    pub fn matched_posts(&self) -> impl Iterator<Item = &Post> {
        self.rows.iter().filter_map(|row| row.post.as_ref())
    }

    /// One bar per distinct bucket key, in calendar order
    pub fn series(&self, granularity: Granularity) -> ChartSeries {
        let mut points: Vec<SeriesPoint> = Vec::new();

        for row in &self.rows {
            let key = row.key(granularity);
            if points.last().is_some_and(|last| last.label == key) {
                continue;
            }
            points.push(SeriesPoint {
                label: key,
                count: row.count(granularity),
            });
        }

        ChartSeries {
            granularity,
            points,
        }
    }
}

/// A single bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// X axis label
    pub label: String,
    /// Bar height
    pub count: u64,
}

/// The `(key, count)` pairs drawn for one granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Bucket size the series was built for
    pub granularity: Granularity,
    /// Bars in calendar order
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    /// Number of bars
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no bars at all
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Tallest bar, zero for an empty or all-zero series
    pub fn max_count(&self) -> u64 {
        self.points.iter().map(|p| p.count).max().unwrap_or(0)
    }

    /// Sum of all bars
    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| p.count).sum()
    }

    /// X axis labels in order
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }
}
