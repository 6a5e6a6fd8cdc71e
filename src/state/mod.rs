//! State module for tracking crawl progress
//!
//! This module provides per-node visitation state for a single crawl run.
//!
//! # Components
//!
//! - `NodeStatus`: where a node is in its lifecycle (unvisited, quoted, in progress, completed, failed)
//! - `VisitTracker`: the shared status map that guarantees each node is handed to a worker once

mod node_status;
mod visits;

// Re-export main types
pub use node_status::NodeStatus;
pub use visits::VisitTracker;
