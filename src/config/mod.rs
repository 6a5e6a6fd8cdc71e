//! Configuration module for Site-Graph
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so running without a configuration file is valid.
//!
//! # Example
//!
//! ```no_run
//! use site_graph::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-graph.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlStrategy, CrawlerConfig, ServerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
