//! State owned by one crawl run
//!
//! The graph and the visitation map are created per crawl and shared by
//! every worker through an `Arc<CrawlSession>`; the page cache belongs to the
//! long-lived `Crawler`.

use crate::crawler::{CrawlReport, CrawlStats, Crawler};
use crate::graph::SharedGraph;
use crate::state::VisitTracker;
use crate::url::node_url;
use crate::CrawlError;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

pub(crate) struct CrawlSession {
    pub(crate) crawler: Crawler,
    pub(crate) graph: SharedGraph,
    pub(crate) visits: VisitTracker,
    pub(crate) stats: CrawlStats,
    pub(crate) max_depth: usize,
    pub(crate) cancel: CancellationToken,
}

impl CrawlSession {
    pub(crate) fn new(crawler: Crawler, max_depth: usize, cancel: CancellationToken) -> Self {
        Self {
            crawler,
            graph: SharedGraph::new(),
            visits: VisitTracker::new(),
            stats: CrawlStats::new(),
            max_depth,
            cancel,
        }
    }

    /// Fetches and parses a claimed page, records its edges, and returns the
    /// targets worth crawling at `depth + 1`
    ///
    /// Zero links and links back to the page's own site are skipped. Targets
    /// are returned only while `depth + 1 < max_depth`, each at most once.
    pub(crate) async fn visit(&self, url: &Url, depth: usize) -> Result<Vec<Url>, CrawlError> {
        let source = node_url(url);

        let parsed = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CrawlError::Cancelled { url: url.to_string() }),
            parsed = self.crawler.parse_website(url) => parsed,
        };

        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                self.visits.fail(&source);
                if !matches!(e, CrawlError::Cancelled { .. }) {
                    self.stats.record_failure();
                }
                return Err(e);
            }
        };

        if parsed.from_cache {
            self.stats.record_cache_hit();
        } else {
            self.stats.record_fetch();
        }

        if let Some(CrawlError::ParseFailed { count, .. }) = &parsed.rejected {
            self.stats.record_rejected_anchors(*count);
        }
        if let Some(rejected) = &parsed.rejected {
            tracing::debug!("{}", rejected);
        }

        let mut seen = HashSet::new();
        let mut next = Vec::new();
        for link in parsed.links.iter() {
            if link.is_zero() {
                self.stats.record_skipped_link();
                continue;
            }

            let target = node_url(&link.href);
            if target == source {
                continue;
            }

            self.graph.add_edge(&source, &target);

            if depth + 1 < self.max_depth && seen.insert(target.clone()) {
                next.push(target);
            }
        }

        self.visits.complete(&source);
        tracing::debug!(
            "Visited {} at depth {}: {} link(s), {} target(s) to follow",
            url,
            depth,
            parsed.links.len(),
            next.len()
        );

        Ok(next)
    }

    /// Logs a node failure at a level matching its cause
    pub(crate) fn report_failure(&self, url: &Url, error: &CrawlError) {
        match error {
            CrawlError::Cancelled { .. } => tracing::debug!("Skipped {}: {}", url, error),
            _ => tracing::warn!("Website crawl failed for {}: {}", url, error),
        }
    }

    /// Turns the finished session into a report
    pub(crate) fn into_report(self: Arc<Self>) -> CrawlReport {
        let cancelled = self.cancel.is_cancelled();
        match Arc::try_unwrap(self) {
            Ok(session) => CrawlReport {
                stats: session.stats.snapshot(),
                graph: session.graph.into_inner(),
                cancelled,
            },
            // A worker still holds a handle; hand out a copy instead
            Err(shared) => CrawlReport {
                stats: shared.stats.snapshot(),
                graph: shared.graph.snapshot(),
                cancelled,
            },
        }
    }
}
