//! Typed accessors for every message the application shows.

use crate::{fluent_args, I18nManager, I18nResult, Locale};
use chrono::NaiveDate;
use std::path::Path;
use termfreq_common::Granularity;

/// Every message id the locale files must define.
pub const MESSAGE_IDS: &[&str] = &[
    "chart-title",
    "axis-mentions",
    "granularity-day",
    "granularity-month",
    "granularity-year",
    "table-heading",
    "table-datetime",
    "table-post-id",
    "table-text",
    "table-username",
    "table-hashtags",
    "app-title",
    "input-term",
    "input-since",
    "input-until",
    "input-granularity",
    "export-action",
    "posts-found",
    "chart-written",
    "csv-written",
];

/// Labels of the raw post table, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeadings {
    /// Publication time
    pub datetime: String,
    /// Post id
    pub post_id: String,
    /// Full text
    pub text: String,
    /// Author handle
    pub username: String,
    /// Hashtags
    pub hashtags: String,
}

/// Messages for one locale
#[derive(Debug)]
pub struct Messages {
    manager: I18nManager,
    locale: Locale,
}

impl Messages {
    /// Messages in the given language, English when it is unsupported
    pub fn new(language: &str) -> I18nResult<Self> {
        let locale = Locale::from_code_or_default(language);
        Ok(Self {
            manager: I18nManager::new(Locale::English)?,
            locale,
        })
    }

    /// Locale messages are rendered in
    pub fn locale(&self) -> Locale {
        self.locale
    }

    fn plain(&self, key: &str) -> String {
        self.manager.get_message_or_key(key, self.locale, None)
    }

    /// Chart title embedding the term and the date window
    pub fn chart_title(&self, term: &str, since: NaiveDate, until: NaiveDate) -> String {
        let args = fluent_args![
            "term" => term.to_string(),
            "since" => since.format("%Y-%m-%d").to_string(),
            "until" => until.format("%Y-%m-%d").to_string(),
        ];
        self.manager
            .get_message_or_key("chart-title", self.locale, args.as_ref())
    }

    /// Y axis title
    pub fn axis_mentions(&self) -> String {
        self.plain("axis-mentions")
    }

    /// X axis title: the name of the bucket size
    pub fn granularity_name(&self, granularity: Granularity) -> String {
        self.plain(&format!("granularity-{}", granularity.key()))
    }

    /// Heading above the raw post table
    pub fn table_heading(&self) -> String {
        self.plain("table-heading")
    }

    /// Column labels of the raw post table
    pub fn table_headings(&self) -> TableHeadings {
        TableHeadings {
            datetime: self.plain("table-datetime"),
            post_id: self.plain("table-post-id"),
            text: self.plain("table-text"),
            username: self.plain("table-username"),
            hashtags: self.plain("table-hashtags"),
        }
    }

    /// Application title
    pub fn app_title(&self) -> String {
        self.plain("app-title")
    }

    /// Label of an input of the interactive session
    pub fn input_label(&self, input: InputField) -> String {
        self.plain(input.message_id())
    }

    /// Label of the export action
    pub fn export_action(&self) -> String {
        self.plain("export-action")
    }

    /// Summary line after a fetch
    pub fn posts_found(&self, count: usize) -> String {
        let args = fluent_args!["count" => count];
        self.manager
            .get_message_or_key("posts-found", self.locale, args.as_ref())
    }

    /// Confirmation after writing the chart
    pub fn chart_written(&self, path: &Path) -> String {
        let args = fluent_args!["path" => path.display().to_string()];
        self.manager
            .get_message_or_key("chart-written", self.locale, args.as_ref())
    }

    /// Confirmation after writing the CSV export
    pub fn csv_written(&self, path: &Path) -> String {
        let args = fluent_args!["path" => path.display().to_string()];
        self.manager
            .get_message_or_key("csv-written", self.locale, args.as_ref())
    }
}

/// Inputs of the interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    /// Search term(s)
    Term,
    /// First day
    Since,
    /// Last day
    Until,
    /// Bucket size
    Granularity,
}

impl InputField {
    fn message_id(self) -> &'static str {
        match self {
            Self::Term => "input-term",
            Self::Since => "input-since",
            Self::Until => "input-until",
            Self::Granularity => "input-granularity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_chart_title_english() {
        let messages = Messages::new("en-US").unwrap();
        assert_eq!(
            messages.chart_title("Soziale Republik", day(2021, 1, 1), day(2021, 3, 1)),
            "Terms: Soziale Republik; Period: 2021-01-01 to 2021-03-01"
        );
    }

    #[test]
    fn test_chart_title_german() {
        let messages = Messages::new("de-DE").unwrap();
        assert_eq!(
            messages.chart_title("Soziale Republik", day(2021, 1, 1), day(2021, 3, 1)),
            "Begriffe: Soziale Republik; Zeitraum: 2021-01-01 bis 2021-03-01"
        );
    }

    #[test]
    fn test_granularity_names() {
        let messages = Messages::new("de").unwrap();
        assert_eq!(messages.granularity_name(Granularity::Month), "Monate");
        assert_eq!(messages.granularity_name(Granularity::Year), "Jahre");
        assert_eq!(messages.granularity_name(Granularity::Day), "Tage");
    }

    #[test]
    fn test_unsupported_language_uses_english() {
        let messages = Messages::new("fr-FR").unwrap();
        assert_eq!(messages.locale(), Locale::English);
        assert_eq!(messages.axis_mentions(), "mention count");
    }

    #[test]
    fn test_table_headings_match_export_columns() {
        let headings = Messages::new("en-US").unwrap().table_headings();
        assert_eq!(headings.post_id, "Tweet Id");
        assert_eq!(headings.username, "Username");
    }

    #[test]
    fn test_input_labels() {
        let messages = Messages::new("de-DE").unwrap();
        assert_eq!(messages.input_label(InputField::Term), "Begriffe");
        assert_eq!(messages.input_label(InputField::Since), "Beginn Zeitraum");
        assert_eq!(messages.export_action(), "Dataframe als csv speichern");
    }
}
