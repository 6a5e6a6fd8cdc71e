//! URL handling module for Site-Graph
//!
//! This module provides seed validation, host-level normalization used for
//! node identity, and resolution of anchor hrefs against the page they were
//! found on.

mod normalize;
mod resolve;

// Re-export main functions
pub use normalize::{node_id, node_url, parse_seed};
pub use resolve::resolve_href;
