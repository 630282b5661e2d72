//! Wiring of configuration, post source, pipeline and outputs

use crate::cli::{OutputArgs, QueryArgs};
use crate::display::write_post_table;
use crate::error::AppResult;
use chrono::{NaiveDate, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use termfreq_common::{QuerySpec, SearchClient};
use termfreq_config::Config;
use termfreq_graphs::{
    export_csv, BarChartRenderer, ChartFormat, ChartLabels, ChartRenderer, ChartStyle, DataFetcher,
    FetchCache, FileSource, Pipeline, PipelineOutput, PostSource, RetryPolicy,
};
use termfreq_i18n::Messages;
use tracing::info;

/// Output choices that do not belong in the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppOptions {
    /// Replay this file instead of querying the search endpoint
    pub from_file: Option<PathBuf>,
    /// Overrides `export.output_dir`
    pub output_dir: Option<PathBuf>,
    /// Chart file format
    pub format: ChartFormat,
    /// Whether to draw the chart at all
    pub chart: bool,
}

impl From<&OutputArgs> for AppOptions {
    fn from(args: &OutputArgs) -> Self {
        Self {
            from_file: args.from_file.clone(),
            output_dir: args.output_dir.clone(),
            format: args.format.into(),
            chart: !args.no_chart,
        }
    }
}

/// A configured termfreq instance
#[derive(Debug)]
pub struct App {
    config: Config,
    options: AppOptions,
    messages: Messages,
    pipeline: Pipeline,
    renderer: BarChartRenderer,
}

impl App {
    /// Build the post source, pipeline and renderer described by `config`
    pub fn new(config: Config, options: AppOptions) -> AppResult<Self> {
        let source: Arc<dyn PostSource> = match &options.from_file {
            Some(path) => Arc::new(FileSource::new(path)),
            None => Arc::new(SearchClient::new(config.source.client_config())?),
        };
        let fetcher = DataFetcher::new(source, RetryPolicy::from(&config.retry));
        info!(
            "Reading posts from {} (up to {} attempt(s))",
            fetcher.describe(),
            fetcher.policy().max_attempts
        );

        let pipeline = Pipeline::new(fetcher, FetchCache::new(&config.cache));

        Ok(Self {
            messages: Messages::new(&config.language)?,
            renderer: BarChartRenderer::new(ChartStyle::from(&config.chart)),
            pipeline,
            options,
            config,
        })
    }

    /// Loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The fetch/shape pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Messages in the configured language
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Fill in what the command line left out from the configured defaults
    pub fn query_spec(&self, args: &QueryArgs) -> AppResult<QuerySpec> {
        self.query_spec_at(args, Utc::now().date_naive())
    }

    fn query_spec_at(&self, args: &QueryArgs, today: NaiveDate) -> AppResult<QuerySpec> {
        let defaults = &self.config.defaults;
        Ok(QuerySpec::new(
            args.term.clone().unwrap_or_else(|| defaults.term.clone()),
            args.since.unwrap_or(defaults.date_since),
            args.until.or(defaults.date_until).unwrap_or(today),
            args.granularity.unwrap_or(defaults.granularity),
        )?)
    }

    /// Run the pipeline for `spec`
    pub async fn run_query(&self, spec: &QuerySpec) -> AppResult<PipelineOutput> {
        Ok(self.pipeline.run(spec).await?)
    }

    fn output_dir(&self) -> &Path {
        self.options
            .output_dir
            .as_deref()
            .unwrap_or(&self.config.export.output_dir)
    }

    /// Where the chart goes, with the extension of the chosen format
    pub fn chart_path(&self) -> PathBuf {
        self.output_dir()
            .join(&self.config.chart.file_name)
            .with_extension(self.options.format.extension())
    }

    /// Where the CSV export goes
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir().join(&self.config.export.csv_file_name)
    }

    /// Draw the chart for a pipeline run. `None` when charts are disabled.
    pub fn write_chart(&self, output: &PipelineOutput) -> AppResult<Option<PathBuf>> {
        if !self.options.chart {
            return Ok(None);
        }

        let path = self.chart_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let labels = ChartLabels::localized(&self.messages, &output.spec);
        self.renderer
            .render_to_file(&output.series, &labels, &path, self.options.format)?;
        Ok(Some(path))
    }

    /// Write the raw posts of a pipeline run as CSV
    pub fn export(&self, output: &PipelineOutput) -> AppResult<PathBuf> {
        let path = self.csv_path();
        export_csv(&output.posts, &path)?;
        Ok(path)
    }

    /// Print the summary line and the raw post table
    pub fn print_table<W: Write>(&self, out: &mut W, output: &PipelineOutput) -> AppResult<()> {
        writeln!(out, "{}", self.messages.posts_found(output.posts.len()))?;
        write_post_table(
            out,
            &self.messages.table_heading(),
            &self.messages.table_headings(),
            &output.posts,
        )?;
        Ok(())
    }

    /// One-shot run: table, chart and export as requested
    pub async fn run_once<W: Write>(
        &self,
        out: &mut W,
        spec: &QuerySpec,
        table: bool,
        export: bool,
    ) -> AppResult<PipelineOutput> {
        let output = self.run_query(spec).await?;

        if table {
            self.print_table(out, &output)?;
        } else {
            writeln!(out, "{}", self.messages.posts_found(output.posts.len()))?;
        }

        if let Some(path) = self.write_chart(&output)? {
            writeln!(out, "{}", self.messages.chart_written(&path))?;
        }

        if export {
            let path = self.export(&output)?;
            writeln!(out, "{}", self.messages.csv_written(&path))?;
        }

        Ok(output)
    }
}
