use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Main configuration structure for Site-Graph
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// How a crawl fans out over discovered sites
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStrategy {
    /// Fixed pool of long-lived workers fed from a bounded job queue
    #[default]
    Pool,

    /// One task per discovered site, joined level by level
    Recursive,
}

impl fmt::Display for CrawlStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool => write!(f, "pool"),
            Self::Recursive => write!(f, "recursive"),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Fan-out strategy
    pub strategy: CrawlStrategy,

    /// Number of workers (pool) or concurrent fetch permits (recursive)
    pub workers: u32,

    /// Capacity of the job and worker event queues
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: u32,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// How long a worker waits to hand a discovered job to the coordinator (milliseconds)
    #[serde(rename = "enqueue-timeout-ms")]
    pub enqueue_timeout_ms: u64,

    /// Deadline for a whole crawl (seconds, 0 disables it)
    #[serde(rename = "crawl-timeout-secs")]
    pub crawl_timeout_secs: u64,

    /// Largest depth a client may request
    #[serde(rename = "max-depth")]
    pub max_depth: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            strategy: CrawlStrategy::Pool,
            workers: 10,
            queue_capacity: 10,
            fetch_timeout_ms: 5_000,
            enqueue_timeout_ms: 2_000,
            crawl_timeout_secs: 0,
            max_depth: 5,
        }
    }
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn enqueue_timeout(&self) -> Duration {
        Duration::from_millis(self.enqueue_timeout_ms)
    }

    /// Returns the whole-crawl deadline, if one is configured
    pub fn crawl_timeout(&self) -> Option<Duration> {
        (self.crawl_timeout_secs > 0).then(|| Duration::from_secs(self.crawl_timeout_secs))
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "site-graph".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/site-graph".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// HTTP query endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(rename = "bind-address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}
