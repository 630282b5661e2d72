//! Search endpoint client with rate limiting and cursor pagination
//!
//! The client speaks to a JSON search endpoint that pages through matching
//! posts with an opaque cursor. It never retries on its own: a failure at
//! any page fails the whole search, and the caller decides whether to start
//! over.

use crate::error::{Result, TermFreqError};
use crate::types::{Post, PostId, Timestamp};
use chrono::NaiveDate;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Configuration for the search client
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    /// Base URL of the search service (e.g., "http://localhost:8080/api")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Rate limit: requests per second (default: 2)
    pub rate_limit_per_sec: u32,
    /// Posts requested per page (default: 100)
    pub page_size: u32,
    /// Stop after this many pages, `None` reads until the cursor runs out
    pub max_pages: Option<u32>,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
            rate_limit_per_sec: 2,
            page_size: 100,
            max_pages: None,
            user_agent: format!("termfreq/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SearchClientConfig {
    /// Create a new configuration pointing at the given service
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rate_limit_per_sec: u32) -> Self {
        self.rate_limit_per_sec = rate_limit_per_sec;
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Cap the number of pages read per search
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Build the backend query string for a term and an inclusive-exclusive window.
pub fn search_query(term: &str, date_since: NaiveDate, date_until: NaiveDate) -> String {
    format!(
        "{} since:{} until:{}",
        term,
        date_since.format("%Y-%m-%d"),
        date_until.format("%Y-%m-%d")
    )
}

/// Rate limited client for the search endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    config: SearchClientConfig,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl SearchClient {
    /// Create a new search client with the given configuration
    pub fn new(config: SearchClientConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            TermFreqError::config_with_source(format!("Invalid search URL '{}'", config.base_url), e)
        })?;

        if config.page_size == 0 {
            return Err(TermFreqError::config("Page size must be greater than 0"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TermFreqError::network_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| TermFreqError::config("Rate limit must be greater than 0"))?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Create a new client with default settings for the given service
    pub fn with_defaults(base_url: impl Into<String>) -> Result<Self> {
        Self::new(SearchClientConfig::new(base_url))
    }

    /// Client configuration
    pub fn config(&self) -> &SearchClientConfig {
        &self.config
    }

    fn build_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }

    /// Fetch a single page of results
    #[instrument(skip(self), fields(cursor = ?cursor))]
    pub async fn fetch_page(&self, query: &str, cursor: Option<&str>) -> Result<SearchPage> {
        self.rate_limiter.until_ready().await;

        let page_size = self.config.page_size.to_string();
        let mut params = vec![("q", query), ("count", page_size.as_str())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }

        let response = self.client.get(self.build_url()).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            if status.is_server_error() || status.as_u16() == 429 {
                warn!("Search endpoint returned {}", status);
            }
            return Err(TermFreqError::upstream_with_status(
                format!("search endpoint returned {}", status),
                status.as_u16(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TermFreqError::network_with_source("Failed to read response body", e))?;

        let page: SearchPage = serde_json::from_str(&body)
            .map_err(|e| TermFreqError::upstream(format!("malformed search page: {e}")))?;
        debug!(posts = page.posts.len(), has_next = page.next_cursor.is_some(), "Fetched page");
        Ok(page)
    }

    /// Run a search to exhaustion and collect every post
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self.fetch_page(query, cursor.as_deref()).await?;
            pages += 1;
            posts.extend(page.posts.into_iter().map(Post::from));

            match page.next_cursor {
                Some(next) if Some(&next) == cursor.as_ref() => {
                    warn!("Search cursor did not advance, stopping after {} page(s)", pages);
                    break;
                }
                Some(next) => cursor = Some(next),
                None => break,
            }

            if self.config.max_pages.is_some_and(|max| pages >= max) {
                info!("Reached page cap of {}", pages);
                break;
            }
        }

        info!("Search returned {} post(s) over {} page(s)", posts.len(), pages);
        Ok(posts)
    }

    /// Get metrics about the client configuration and state
    pub fn get_client_metrics(&self) -> ClientMetrics {
        ClientMetrics {
            base_url: self.config.base_url.clone(),
            timeout_secs: self.config.timeout_secs,
            rate_limit_per_sec: self.config.rate_limit_per_sec,
            page_size: self.config.page_size,
            has_rate_limit_capacity: self.rate_limiter.check().is_ok(),
        }
    }
}

/// Client metrics for debugging
#[derive(Debug, Clone, Serialize)]
pub struct ClientMetrics {
    /// Base URL of the search service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Requests per second allowed
    pub rate_limit_per_sec: u32,
    /// Posts requested per page
    pub page_size: u32,
    /// Whether we currently have rate limit capacity
    pub has_rate_limit_capacity: bool,
}

// ============================================================================
// Wire models
// ============================================================================

/// One page of search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchPage {
    /// Posts on this page
    #[serde(default)]
    pub posts: Vec<WirePost>,
    /// Cursor of the next page, absent on the last one
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A post as the search endpoint serializes it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WirePost {
    /// Publication time, RFC 3339
    pub date: Timestamp,
    /// Post id, number or string
    pub id: PostId,
    /// Full text
    pub content: String,
    /// Author
    pub user: WireUser,
    /// Hashtags, `null` when there are none
    #[serde(default)]
    pub hashtags: Option<Vec<String>>,
}

/// Author block of a wire post
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireUser {
    /// Author handle
    pub username: String,
}

impl From<WirePost> for Post {
    fn from(wire: WirePost) -> Self {
        Self {
            timestamp: wire.date,
            post_id: wire.id,
            text: wire.content,
            author: wire.user.username,
            hashtags: wire.hashtags,
        }
    }
}
