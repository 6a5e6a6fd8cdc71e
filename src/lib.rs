//! Site-Graph: a concurrent website link mapper
//!
//! This crate crawls outward from a seed URL up to a bounded depth and
//! assembles the discovered site-to-site links into a deduplicated graph,
//! served as JSON over a small HTTP query endpoint.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod server;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Graph startup and serving
#[derive(Debug, Error)]
pub enum SiteGraphError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while crawling a single node
///
/// These never abort a whole crawl; the coordinator logs them and marks the
/// node as failed.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Fetch failed for {url}: HTTP {status} {reason}")]
    FetchFailed {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTML parse error for {url}: {count} anchor(s) rejected: {summary}")]
    ParseFailed {
        url: String,
        count: usize,
        summary: String,
    },

    #[error("Crawl cancelled before {url} was processed")]
    Cancelled { url: String },

    #[error("Crawl worker failed: {0}")]
    Worker(String),
}

/// Errors for a single anchor element during link extraction
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("anchor has no child node")]
    MissingText,

    #[error("anchor has no href attribute")]
    MissingHref,

    #[error("invalid href '{href}': {source}")]
    InvalidHref {
        href: String,
        source: ::url::ParseError,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Site-Graph startup operations
pub type Result<T> = std::result::Result<T, SiteGraphError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler};
pub use graph::{Graph, GraphView, Node};
pub use state::NodeStatus;
pub use url::{node_url, parse_seed};
