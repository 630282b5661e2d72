//! Common type definitions and newtype wrappers for domain modeling.

use crate::error::{Result, TermFreqError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp type used throughout the application.
pub type Timestamp = DateTime<Utc>;

/// Opaque identifier of a post as handed out by the search backend.
///
/// Backends disagree on whether ids are numbers or strings, so both are
/// accepted on the wire and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    /// Borrow the id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Number(u64),
            Text(String),
        }

        Ok(match WireId::deserialize(deserializer)? {
            WireId::Number(n) => Self(n.to_string()),
            WireId::Text(s) => Self(s),
        })
    }
}

/// A single post matching a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// When the post was published.
    pub timestamp: Timestamp,
    /// Backend id of the post.
    pub post_id: PostId,
    /// Full text.
    pub text: String,
    /// Author handle.
    pub author: String,
    /// Hashtags, `None` when the backend reported none at all.
    pub hashtags: Option<Vec<String>>,
}

impl Post {
    /// Calendar date of the post in UTC.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Posts in the order the backend returned them.
pub type PostCollection = Vec<Post>;

/// Bucket size used when counting posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day.
    Day,
    /// One bucket per year-month.
    #[default]
    Month,
    /// One bucket per year.
    Year,
}

impl Granularity {
    /// All granularities in the order they are offered to the user.
    pub const ALL: [Granularity; 3] = [Granularity::Month, Granularity::Year, Granularity::Day];

    /// Stable lowercase key, also used as the localization message suffix.
    pub fn key(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Granularity {
    type Err = TermFreqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" | "daily" | "d" | "tage" => Ok(Self::Day),
            "month" | "months" | "monthly" | "m" | "monate" => Ok(Self::Month),
            "year" | "years" | "yearly" | "y" | "jahre" => Ok(Self::Year),
            other => Err(TermFreqError::validation_field(
                format!("unknown granularity '{other}', expected day, month or year"),
                "granularity",
            )),
        }
    }
}

/// Everything needed to run the pipeline once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuerySpec {
    term: String,
    date_since: NaiveDate,
    date_until: NaiveDate,
    granularity: Granularity,
}

impl QuerySpec {
    /// Build a spec, rejecting windows that end before they start.
    ///
    /// The term is passed through untouched; an empty term is a valid
    /// (if unhelpful) search.
    pub fn new(
        term: impl Into<String>,
        date_since: NaiveDate,
        date_until: NaiveDate,
        granularity: Granularity,
    ) -> Result<Self> {
        if date_since > date_until {
            return Err(TermFreqError::validation_field(
                format!("date_until ({date_until}) is before date_since ({date_since})"),
                "date_until",
            ));
        }

        Ok(Self {
            term: term.into(),
            date_since,
            date_until,
            granularity,
        })
    }

    /// Search term(s).
    pub fn term(&self) -> &str {
        &self.term
    }

    /// First day of the window.
    pub fn date_since(&self) -> NaiveDate {
        self.date_since
    }

    /// Last day of the window.
    pub fn date_until(&self) -> NaiveDate {
        self.date_until
    }

    /// Requested bucket size.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Same window and term, different bucket size.
    pub fn with_granularity(&self, granularity: Granularity) -> Self {
        Self {
            granularity,
            ..self.clone()
        }
    }

    /// The part of the query that determines what gets fetched.
    pub fn fetch_key(&self) -> FetchKey {
        FetchKey {
            term: self.term.clone(),
            date_since: self.date_since,
            date_until: self.date_until,
        }
    }
}

/// Identity of a fetch: granularity is a display concern and left out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchKey {
    /// Search term(s)
    pub term: String,
    /// First day of the window
    pub date_since: NaiveDate,
    /// Last day of the window
    pub date_until: NaiveDate,
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}..={}", self.term, self.date_since, self.date_until)
    }
}
