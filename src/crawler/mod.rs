//! Crawler module for building site link graphs
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing and link extraction
//! - Caching of extracted links
//! - Crawl coordination (worker pool or recursive fan-out)

mod cache;
mod coordinator;
mod fetcher;
mod parser;
mod recursive;
mod session;
mod stats;

pub use cache::PageCache;
pub use coordinator::Job;
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use parser::{extract_links, iter_links, Extraction, Link, LinkIter};
pub use stats::{CrawlStats, StatsSnapshot};

use crate::config::{Config, CrawlStrategy, CrawlerConfig};
use crate::graph::Graph;
use crate::CrawlError;
use reqwest::Client;
use session::CrawlSession;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Links for one page, as returned by [`Crawler::parse_website`]
#[derive(Debug)]
pub struct ParsedWebsite {
    pub links: Arc<[Link]>,

    /// True if the links came from the page cache
    pub from_cache: bool,

    /// Combined error for anchors that could not be parsed
    pub rejected: Option<CrawlError>,
}

/// Result of one crawl run
#[derive(Debug)]
pub struct CrawlReport {
    pub graph: Graph,
    pub stats: StatsSnapshot,

    /// True if the crawl stopped early on cancellation or deadline
    pub cancelled: bool,
}

/// Long-lived crawler: HTTP client, page cache and settings
///
/// Cloning is cheap and clones share the page cache.
#[derive(Debug, Clone)]
pub struct Crawler {
    client: Client,
    cache: Arc<PageCache>,
    config: Arc<CrawlerConfig>,
}

impl Crawler {
    /// Builds a crawler from the service configuration
    pub fn new(config: &Config) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent, config.crawler.fetch_timeout())?;
        Ok(Self::with_client(client, config.crawler.clone()))
    }

    pub fn with_client(client: Client, config: CrawlerConfig) -> Self {
        Self {
            client,
            cache: Arc::new(PageCache::new()),
            config: Arc::new(config),
        }
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Returns the links of `url`, from the cache or by fetching it
    ///
    /// Anchors that fail to parse do not fail the page; they are reported in
    /// [`ParsedWebsite::rejected`] next to the links that did parse.
    pub async fn parse_website(&self, url: &Url) -> Result<ParsedWebsite, CrawlError> {
        if let Some(links) = self.cache.get(url.as_str()) {
            return Ok(ParsedWebsite {
                links,
                from_cache: true,
                rejected: None,
            });
        }

        let page = fetch_page(&self.client, url).await?;
        if page.final_url != *url {
            tracing::debug!("{} redirected to {}", url, page.final_url);
        }
        let extraction = extract_links(url, &page.body);
        let (links, rejected) = extraction.into_result(url);
        let links: Arc<[Link]> = links.into();

        self.cache.put(url.as_str(), links.clone());

        Ok(ParsedWebsite {
            links,
            from_cache: false,
            rejected,
        })
    }

    /// Crawls outward from `seed` and returns the assembled graph
    ///
    /// The seed's node is registered before anything else, so a crawl with
    /// `max_depth == 0` returns one node and no edges. Pages at depth `d` are
    /// fetched only while `d < max_depth`. Node failures never fail the
    /// crawl; cancelling `cancel` (or hitting the configured deadline) stops
    /// it and returns the partial graph.
    pub async fn crawl(
        &self,
        seed: &Url,
        max_depth: usize,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let cancel = cancel.child_token();
        let deadline = self
            .config
            .crawl_timeout()
            .map(|limit| arm_deadline(cancel.clone(), limit));

        let session = Arc::new(CrawlSession::new(self.clone(), max_depth, cancel.clone()));
        session.graph.add_node(seed);

        tracing::info!(
            "Starting {} crawl of {} (max depth {})",
            self.config.strategy,
            seed,
            max_depth
        );
        let started = Instant::now();

        let outcome = if max_depth == 0 {
            Ok(())
        } else {
            match self.config.strategy {
                CrawlStrategy::Pool => coordinator::run_pool(session.clone(), seed.clone()).await,
                CrawlStrategy::Recursive => {
                    recursive::run_recursive(session.clone(), seed.clone()).await
                }
            }
        };

        if let Some(deadline) = deadline {
            deadline.abort();
        }
        outcome?;

        let report = session.into_report();
        stats::log_summary(seed.as_str(), &report.graph, &report.stats, started.elapsed());
        Ok(report)
    }
}

/// Cancels `token` once `limit` has elapsed
fn arm_deadline(token: CancellationToken, limit: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(limit) => {
                tracing::warn!("Crawl deadline of {:?} reached, returning partial graph", limit);
                token.cancel();
            }
            _ = token.cancelled() => {}
        }
    })
}
