//! Per-crawl statistics
//!
//! Counters are updated concurrently by workers and read once when the crawl
//! finishes.

use crate::graph::Graph;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Live counters for one crawl run
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicUsize,
    cache_hits: AtomicUsize,
    failures: AtomicUsize,
    jobs_dropped: AtomicUsize,
    links_skipped: AtomicUsize,
    anchors_rejected: AtomicUsize,
}

/// Point-in-time copy of `CrawlStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Pages fetched over the network
    pub pages_fetched: usize,
    /// Pages served from the page cache
    pub cache_hits: usize,
    /// Nodes whose fetch failed
    pub failures: usize,
    /// Discovered jobs dropped because the coordinator queue stayed full
    pub jobs_dropped: usize,
    /// Zero links ignored
    pub links_skipped: usize,
    /// Anchors that could not be turned into links
    pub anchors_rejected: usize,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped_job(&self) {
        self.jobs_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_link(&self) {
        self.links_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_anchors(&self, count: usize) {
        self.anchors_rejected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            jobs_dropped: self.jobs_dropped.load(Ordering::Relaxed),
            links_skipped: self.links_skipped.load(Ordering::Relaxed),
            anchors_rejected: self.anchors_rejected.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Pages whose links were obtained, from the network or the cache
    pub fn pages_visited(&self) -> usize {
        self.pages_fetched + self.cache_hits
    }
}

/// Logs a one-line summary of a finished crawl
pub fn log_summary(seed: &str, graph: &Graph, stats: &StatsSnapshot, elapsed: Duration) {
    tracing::info!(
        "Crawl of {} finished in {:?}: {} nodes, {} edges, {} pages fetched, {} cache hits, {} failed",
        seed,
        elapsed,
        graph.node_count(),
        graph.edge_count(),
        stats.pages_fetched,
        stats.cache_hits,
        stats.failures
    );

    if stats.jobs_dropped > 0 {
        tracing::warn!(
            "{} discovered job(s) were dropped because the queue stayed full",
            stats.jobs_dropped
        );
    }

    tracing::debug!(
        "Skipped {} zero link(s), rejected {} anchor(s)",
        stats.links_skipped,
        stats.anchors_rejected
    );
}
