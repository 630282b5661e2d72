//! Post acquisition with a bounded retry policy.
//!
//! A [`PostSource`] produces every post for a fetch key in one go. The
//! [`DataFetcher`] wraps a source and restarts the whole fetch when it fails
//! with a transient error; partial results of a failed attempt are never
//! kept.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use termfreq_common::scraper::WirePost;
use termfreq_common::{
    search_query, FetchKey, Post, PostCollection, Result, SearchClient, SearchPage, TermFreqError,
};
use termfreq_config::RetryConfig;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, info, instrument, warn};

/// Anything that can produce the posts matching a fetch key
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch every post for the key. A failure discards everything read so far.
    async fn fetch_posts(&self, key: &FetchKey) -> Result<PostCollection>;

    /// Short human readable description for logs
    fn describe(&self) -> String;
}

#[async_trait]
impl PostSource for SearchClient {
    async fn fetch_posts(&self, key: &FetchKey) -> Result<PostCollection> {
        let query = search_query(&key.term, key.date_since, key.date_until);
        self.search(&query).await
    }

    fn describe(&self) -> String {
        format!("search endpoint {}", self.config().base_url)
    }
}

/// Replays a saved search result from a local JSON file.
///
/// The file holds either a top-level array of posts or a full search page.
/// It is returned whole: the file is assumed to be the result of the search
/// being replayed.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SavedSearch {
    Posts(Vec<WirePost>),
    Page(SearchPage),
}

impl FileSource {
    /// Source reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The replayed file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl PostSource for FileSource {
    async fn fetch_posts(&self, key: &FetchKey) -> Result<PostCollection> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let wire = match serde_json::from_str::<SavedSearch>(&content)? {
            SavedSearch::Posts(posts) => posts,
            SavedSearch::Page(page) => page.posts,
        };

        debug!(posts = wire.len(), key = %key, "Replayed saved search");
        Ok(wire.into_iter().map(Post::from).collect())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path().display())
    }
}

/// Attempt cap and backoff schedule for fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound of any single delay
    pub max_delay: Duration,
    /// Randomize each delay between zero and its nominal value
    pub jitter: bool,
}

impl RetryPolicy {
    /// Same attempt cap, no waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }

    /// Delays between consecutive attempts: one fewer than the attempt cap.
    ///
    /// Doubles from `initial_delay` and is capped at `max_delay`.
    pub fn delays(&self) -> Vec<Duration> {
        let initial_ms = u64::try_from(self.initial_delay.as_millis()).unwrap_or(u64::MAX);
        let retries = self.max_attempts.saturating_sub(1) as usize;

        // The backoff starts at base * factor, so run it at twice the scale and halve
        let backoff = ExponentialBackoff::from_millis(2)
            .factor(initial_ms)
            .max_delay(self.max_delay.saturating_mul(2))
            .map(|delay| delay / 2);

        if self.jitter {
            backoff.map(jitter).take(retries).collect()
        } else {
            backoff.take(retries).collect()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: config.max_delay(),
            jitter: config.jitter,
        }
    }
}

/// A post source under a retry policy
#[derive(Clone)]
pub struct DataFetcher {
    source: Arc<dyn PostSource>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for DataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFetcher")
            .field("source", &self.source.describe())
            .field("policy", &self.policy)
            .finish()
    }
}

impl DataFetcher {
    /// Creates a new data fetcher.
    pub fn new(source: Arc<dyn PostSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Description of the wrapped source
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Fetch every post for `key`, restarting from scratch on transient failures.
    ///
    /// Permanent failures are returned as they are. When the attempt cap is
    /// hit on a transient failure the last error is wrapped in
    /// [`TermFreqError::RetriesExhausted`].
    #[instrument(skip(self, key), fields(key = %key, source = %self.source.describe()))]
    pub async fn fetch(&self, key: &FetchKey) -> Result<PostCollection> {
        let attempts = AtomicU32::new(0);
        let max_attempts = self.policy.max_attempts;

        let action = || async {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            let result = self.source.fetch_posts(key).await;
            if let Err(e) = &result {
                if e.is_transient() && attempt < max_attempts {
                    warn!(attempt, max_attempts, "Fetch attempt failed, retrying: {}", e);
                } else {
                    warn!(attempt, max_attempts, "Fetch attempt failed: {}", e);
                }
            }
            result
        };

        match RetryIf::spawn(self.policy.delays(), action, TermFreqError::is_transient).await {
            Ok(posts) => {
                info!(
                    posts = posts.len(),
                    attempts = attempts.load(Ordering::Relaxed),
                    "Fetch complete"
                );
                Ok(posts)
            }
            Err(e) if e.is_transient() => Err(TermFreqError::RetriesExhausted {
                attempts: attempts.load(Ordering::Relaxed),
                source: Box::new(e),
            }),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termfreq_common::test_utils::post_fixtures::{page_json, sample_posts};
    use termfreq_common::test_utils::{date, init_test_logging};

    /// Fails a fixed number of times before answering
    struct FlakySource {
        calls: AtomicU32,
        failures: u32,
        make_error: fn() -> TermFreqError,
    }

    impl FlakySource {
        fn new(failures: u32, make_error: fn() -> TermFreqError) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
                make_error,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl PostSource for FlakySource {
        async fn fetch_posts(&self, _key: &FetchKey) -> Result<PostCollection> {
            let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
            if call <= self.failures {
                Err((self.make_error)())
            } else {
                Ok(sample_posts())
            }
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    fn timeout() -> TermFreqError {
        TermFreqError::network("connection timed out")
    }

    fn not_found() -> TermFreqError {
        TermFreqError::upstream_with_status("search endpoint returned 404", 404)
    }

    fn key() -> FetchKey {
        FetchKey {
            term: "Soziale Republik".to_string(),
            date_since: date(2021, 1, 1),
            date_until: date(2022, 1, 31),
        }
    }

    #[tokio::test]
    async fn test_success_after_transient_failures() {
        init_test_logging();
        let source = Arc::new(FlakySource::new(3, timeout));
        let fetcher = DataFetcher::new(source.clone(), RetryPolicy::immediate(5));

        let posts = fetcher.fetch(&key()).await.unwrap();

        assert_eq!(posts, sample_posts());
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn test_exhaustion_is_typed() {
        let source = Arc::new(FlakySource::new(u32::MAX, timeout));
        let fetcher = DataFetcher::new(source.clone(), RetryPolicy::immediate(3));

        match fetcher.fetch(&key()).await {
            Err(TermFreqError::RetriesExhausted { attempts, source: cause }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*cause, TermFreqError::Network { .. }));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let source = Arc::new(FlakySource::new(u32::MAX, not_found));
        let fetcher = DataFetcher::new(source.clone(), RetryPolicy::immediate(5));

        let err = fetcher.fetch(&key()).await.unwrap_err();

        assert!(matches!(
            err,
            TermFreqError::Upstream {
                status_code: Some(404),
                ..
            }
        ));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_policy() {
        let source = Arc::new(FlakySource::new(1, timeout));
        let fetcher = DataFetcher::new(source.clone(), RetryPolicy::immediate(1));

        let err = fetcher.fetch(&key()).await.unwrap_err();

        assert!(matches!(err, TermFreqError::RetriesExhausted { attempts: 1, .. }));
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(3000),
            jitter: false,
        };

        assert_eq!(
            policy.delays(),
            vec![
                Duration::from_millis(500),
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(3000),
            ]
        );
    }

    #[test]
    fn test_odd_initial_delay_is_exact() {
        let policy = RetryPolicy {
            max_attempts: 4,
            initial_delay: Duration::from_millis(333),
            max_delay: Duration::from_millis(1000),
            jitter: false,
        };
        assert_eq!(
            policy.delays(),
            vec![
                Duration::from_millis(333),
                Duration::from_millis(666),
                Duration::from_millis(1000),
            ]
        );

        let shortest = RetryPolicy {
            initial_delay: Duration::from_millis(1),
            ..policy
        };
        assert_eq!(shortest.delays()[0], Duration::from_millis(1));
    }

    #[test]
    fn test_jittered_delays_stay_below_nominal() {
        let policy = RetryPolicy {
            jitter: true,
            ..RetryPolicy::from(&RetryConfig::default())
        };
        let nominal = RetryPolicy {
            jitter: false,
            ..policy.clone()
        };

        for (jittered, cap) in policy.delays().into_iter().zip(nominal.delays()) {
            assert!(jittered <= cap);
        }
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from(&RetryConfig::default());
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delays().len(), 4);
        assert_eq!(RetryPolicy::immediate(3).delays(), vec![Duration::ZERO; 2]);
    }

    #[test]
    fn test_file_source_reads_page_and_array() {
        let dir = tempfile::tempdir().unwrap();
        let posts = sample_posts();

        let page_path = dir.path().join("page.json");
        std::fs::write(&page_path, page_json(&posts)).unwrap();

        let page: serde_json::Value = serde_json::from_str(&page_json(&posts)).unwrap();
        let array_path = dir.path().join("array.json");
        std::fs::write(&array_path, page["posts"].to_string()).unwrap();

        for path in [page_path, array_path] {
            let source = FileSource::new(&path);
            assert_eq!(source.path(), path.as_path());
            let fetched = tokio_test::block_on(source.fetch_posts(&key()));
            assert_eq!(tokio_test::assert_ok!(fetched), posts);
            assert!(source.describe().contains("json"));
        }
    }

    #[tokio::test]
    async fn test_file_source_errors_are_permanent() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();

        let fetcher = DataFetcher::new(Arc::new(FileSource::new(&broken)), RetryPolicy::immediate(3));
        assert_eq!(fetcher.policy(), &RetryPolicy::immediate(3));
        assert!(matches!(
            fetcher.fetch(&key()).await,
            Err(TermFreqError::Serialization(_))
        ));

        let missing = FileSource::new(dir.path().join("missing.json"));
        assert!(matches!(
            missing.fetch_posts(&key()).await,
            Err(TermFreqError::Io(_))
        ));
    }
}
