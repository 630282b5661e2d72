//! Fetch, shape and series selection for one query

use crate::aggregator::shape;
use crate::cache::FetchCache;
use crate::data_fetcher::DataFetcher;
use crate::types::{ChartSeries, ShapedTable};
use std::sync::Arc;
use termfreq_common::{PostCollection, QuerySpec, Result};
use tracing::{info, instrument, warn};

/// Everything one pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The query that was run
    pub spec: QuerySpec,
    /// Fetched posts in source order, as exported
    pub posts: Arc<PostCollection>,
    /// Calendar-complete counted table
    pub table: ShapedTable,
    /// Bars for the requested granularity
    pub series: ChartSeries,
}

/// Runs `fetch -> shape -> select series` with memoized fetches.
///
/// No UI is involved; the CLI and the interactive session both drive this.
#[derive(Debug, Clone)]
pub struct Pipeline {
    fetcher: DataFetcher,
    cache: FetchCache,
}

impl Pipeline {
    /// Pipeline fetching through `fetcher`, memoized in `cache`
    pub fn new(fetcher: DataFetcher, cache: FetchCache) -> Self {
        Self { fetcher, cache }
    }

    /// The fetch memo
    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Run the pipeline for `spec`.
    ///
    /// Posts come from the cache when term and window were fetched before;
    /// only the shaping and series selection are redone.
    #[instrument(skip(self), fields(term = %spec.term(), granularity = %spec.granularity()))]
    pub async fn run(&self, spec: &QuerySpec) -> Result<PipelineOutput> {
        if spec.term().trim().is_empty() {
            warn!("Search term is empty, searching anyway");
        }

        let key = spec.fetch_key();
        let posts = self
            .cache
            .get_or_fetch(&key, || self.fetcher.fetch(&key))
            .await?;

        let table = shape(&posts, spec.date_since(), spec.date_until());
        let series = table.series(spec.granularity());

        info!(
            posts = posts.len(),
            rows = table.len(),
            bars = series.len(),
            "Pipeline run complete"
        );

        Ok(PipelineOutput {
            spec: spec.clone(),
            posts,
            table,
            series,
        })
    }
}
