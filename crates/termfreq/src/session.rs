//! Line-oriented interactive session.
//!
//! Each input line changes one input or asks for an output. The pipeline
//! runs again only when the query actually changed; a granularity change
//! reuses the cached posts.

use crate::app::App;
use crate::error::{AppError, AppResult};
use chrono::NaiveDate;
use std::io::Write;
use termfreq_common::{parse_date, Granularity, QuerySpec};
use termfreq_graphs::PipelineOutput;
use termfreq_i18n::{InputField, Messages};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error};

/// Command reference, described in the session language
pub fn help_text(messages: &Messages) -> String {
    let rows = [
        ("term <text>".to_string(), messages.input_label(InputField::Term)),
        ("since <YYYY-MM-DD>".to_string(), messages.input_label(InputField::Since)),
        ("until <YYYY-MM-DD>".to_string(), messages.input_label(InputField::Until)),
        (
            "granularity <day|month|year>".to_string(),
            messages.input_label(InputField::Granularity),
        ),
        ("show".to_string(), messages.table_heading()),
        ("export".to_string(), messages.export_action()),
        ("help".to_string(), "?".to_string()),
        ("quit".to_string(), String::new()),
    ];

    rows.iter()
        .map(|(command, description)| format!("  {command:<30}{description}").trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// `term <text>`
    Term(String),
    /// `since <YYYY-MM-DD>`
    Since(NaiveDate),
    /// `until <YYYY-MM-DD>`
    Until(NaiveDate),
    /// `granularity <day|month|year>`
    Granularity(Granularity),
    /// Print the post table
    Show,
    /// Write the CSV export
    Export,
    /// Print the command reference
    Help,
    /// Leave the session
    Quit,
}

/// Parse an input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> AppResult<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "term" | "terms" => SessionCommand::Term(rest.to_string()),
        "since" => SessionCommand::Since(parse_date(rest, "date_since")?),
        "until" => SessionCommand::Until(parse_date(rest, "date_until")?),
        "granularity" | "g" => SessionCommand::Granularity(rest.parse()?),
        "show" => SessionCommand::Show,
        "export" => SessionCommand::Export,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(AppError::Input(format!("unknown command '{other}', try 'help'"))),
    };
    Ok(Some(command))
}

/// Whether the session goes on after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Stop reading
    Quit,
}

/// Interactive state: the current query and the output of its last run
#[derive(Debug)]
pub struct Session<'a> {
    app: &'a App,
    spec: QuerySpec,
    last: Option<PipelineOutput>,
}

impl<'a> Session<'a> {
    /// Session starting from `spec`; nothing runs until [`Session::run`] or a command
    pub fn new(app: &'a App, spec: QuerySpec) -> Self {
        Self {
            app,
            spec,
            last: None,
        }
    }

    /// The current query
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Output of the most recent run
    pub fn last_output(&self) -> Option<&PipelineOutput> {
        self.last.as_ref()
    }

    fn write_status<W: Write>(&self, out: &mut W) -> AppResult<()> {
        let messages = self.app.messages();
        writeln!(
            out,
            "{}: {} | {}: {} | {}: {} | {}: {}",
            messages.input_label(InputField::Term),
            self.spec.term(),
            messages.input_label(InputField::Since),
            self.spec.date_since(),
            messages.input_label(InputField::Until),
            self.spec.date_until(),
            messages.input_label(InputField::Granularity),
            messages.granularity_name(self.spec.granularity()),
        )?;
        Ok(())
    }

    /// Run the pipeline if the query changed since the last run.
    ///
    /// Returns whether it ran.
    pub async fn refresh<W: Write>(&mut self, out: &mut W) -> AppResult<bool> {
        if self.last.as_ref().is_some_and(|last| last.spec == self.spec) {
            debug!("Query unchanged, not re-running");
            return Ok(false);
        }

        self.write_status(out)?;
        let output = self.app.run_query(&self.spec).await?;
        writeln!(out, "{}", self.app.messages().posts_found(output.posts.len()))?;

        if let Some(path) = self.app.write_chart(&output)? {
            writeln!(out, "{}", self.app.messages().chart_written(&path))?;
        }

        self.last = Some(output);
        Ok(true)
    }

    fn update(&mut self, term: String, since: NaiveDate, until: NaiveDate, granularity: Granularity) -> AppResult<()> {
        self.spec = QuerySpec::new(term, since, until, granularity)?;
        Ok(())
    }

    /// Apply one command, re-running the pipeline when it changed the query
    pub async fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> AppResult<Flow> {
        let spec = self.spec.clone();
        match command {
            SessionCommand::Term(term) => {
                self.update(term, spec.date_since(), spec.date_until(), spec.granularity())?
            }
            SessionCommand::Since(since) => {
                self.update(spec.term().to_string(), since, spec.date_until(), spec.granularity())?
            }
            SessionCommand::Until(until) => {
                self.update(spec.term().to_string(), spec.date_since(), until, spec.granularity())?
            }
            SessionCommand::Granularity(granularity) => self.spec = spec.with_granularity(granularity),
            SessionCommand::Show => {
                self.refresh(out).await?;
                if let Some(output) = &self.last {
                    self.app.print_table(out, output)?;
                }
                return Ok(Flow::Continue);
            }
            SessionCommand::Export => {
                self.refresh(out).await?;
                if let Some(output) = &self.last {
                    let path = self.app.export(output)?;
                    writeln!(out, "{}", self.app.messages().csv_written(&path))?;
                }
                return Ok(Flow::Continue);
            }
            SessionCommand::Help => {
                writeln!(out, "{}", help_text(self.app.messages()))?;
                return Ok(Flow::Continue);
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        self.refresh(out).await?;
        Ok(Flow::Continue)
    }

    /// Read commands until `quit` or end of input.
    ///
    /// Failed commands are reported and the session goes on; only failures
    /// to write the output end it.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{}", self.app.messages().app_title())?;
        if let Err(e) = self.refresh(out).await {
            report(out, &e)?;
        }

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let result = match parse_command(&line) {
                Ok(Some(command)) => self.execute(command, out).await,
                Ok(None) => Ok(Flow::Continue),
                Err(e) => Err(e),
            };

            match result {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(AppError::Io(e)) => return Err(AppError::Io(e)),
                Err(e) => report(out, &e)?,
            }
        }

        writeln!(out)?;
        Ok(())
    }
}

fn report<W: Write>(out: &mut W, e: &AppError) -> AppResult<()> {
    error!("{}", e);
    writeln!(out, "error: {e}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use termfreq_common::test_utils::date;
    use termfreq_common::test_utils::post_fixtures::{page_json, sample_posts};
    use termfreq_config::Config;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("term Soziale Republik").unwrap(),
            Some(SessionCommand::Term("Soziale Republik".to_string()))
        );
        assert_eq!(
            parse_command("  since 2021-02-01 ").unwrap(),
            Some(SessionCommand::Since(date(2021, 2, 1)))
        );
        assert_eq!(
            parse_command("granularity Jahre").unwrap(),
            Some(SessionCommand::Granularity(Granularity::Year))
        );
        assert_eq!(parse_command("term").unwrap(), Some(SessionCommand::Term(String::new())));
        assert_eq!(parse_command("QUIT").unwrap(), Some(SessionCommand::Quit));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_help_is_localized() {
        let help = help_text(&Messages::new("de-DE").unwrap());
        assert!(help.contains("Dataframe als csv speichern"));
        assert!(help.contains("Beginn Zeitraum"));
        assert_eq!(help.lines().count(), 8);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_command("frobnicate"), Err(AppError::Input(_))));
        assert!(matches!(parse_command("until tomorrow"), Err(AppError::Core(_))));
        assert!(matches!(parse_command("granularity week"), Err(AppError::Core(_))));
    }

    fn replay_app(dir: &std::path::Path) -> App {
        let saved = dir.join("search.json");
        std::fs::write(&saved, page_json(&sample_posts())).unwrap();
        App::new(
            Config::default(),
            AppOptions {
                from_file: Some(saved),
                output_dir: Some(dir.join("out")),
                chart: false,
                ..AppOptions::default()
            },
        )
        .unwrap()
    }

    fn spec() -> QuerySpec {
        QuerySpec::new("Republik", date(2021, 1, 1), date(2022, 1, 31), Granularity::Month).unwrap()
    }

    #[tokio::test]
    async fn test_reruns_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let app = replay_app(dir.path());
        let mut session = Session::new(&app, spec());
        let mut out = Vec::new();

        assert!(session.refresh(&mut out).await.unwrap());
        assert!(!session.refresh(&mut out).await.unwrap());

        // Same granularity again: nothing to do
        session
            .execute(SessionCommand::Granularity(Granularity::Month), &mut out)
            .await
            .unwrap();
        // New granularity: re-shaped from the cached fetch
        session
            .execute(SessionCommand::Granularity(Granularity::Year), &mut out)
            .await
            .unwrap();

        let metrics = app.pipeline().cache().metrics();
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.hits(), 1);
        assert_eq!(session.last_output().unwrap().series.len(), 2);
    }

    #[tokio::test]
    async fn test_inverted_window_keeps_previous_query() {
        let dir = tempfile::tempdir().unwrap();
        let app = replay_app(dir.path());
        let mut session = Session::new(&app, spec());
        let mut out = Vec::new();

        let result = session
            .execute(SessionCommand::Since(date(2023, 1, 1)), &mut out)
            .await;

        assert!(result.is_err());
        assert_eq!(session.spec(), &spec());
    }

    #[tokio::test]
    async fn test_scripted_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = replay_app(dir.path());
        let mut session = Session::new(&app, spec());
        let mut out = Vec::new();

        let script = "granularity year\nbogus\nshow\nexport\nquit\nterm never read\n";
        session.run(script.as_bytes(), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Twitter Term Frequency"));
        assert!(text.contains("6 posts found"));
        assert!(text.contains("error: unknown command 'bogus'"));
        assert!(text.contains("Tweet Id"));
        assert!(text.contains("Table written to"));
        assert!(!text.contains("never read"));
        assert_eq!(session.spec().granularity(), Granularity::Year);
        assert_eq!(session.spec().term(), "Republik");
        assert!(dir.path().join("out").join("tweets_df.csv").exists());
    }

    #[tokio::test]
    async fn test_end_of_input_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = replay_app(dir.path());
        let mut session = Session::new(&app, spec());
        let mut out = Vec::new();

        session.run("term Mietendeckel".as_bytes(), &mut out).await.unwrap();

        assert_eq!(session.spec().term(), "Mietendeckel");
    }
}
