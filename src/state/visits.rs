//! Shared visitation map for one crawl run

use crate::state::NodeStatus;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Tracks the status of every node touched by a crawl
///
/// All check-then-set sequences happen under one lock, so a node can be
/// quoted or claimed by exactly one caller.
#[derive(Debug, Default)]
pub struct VisitTracker {
    statuses: Mutex<HashMap<Url, NodeStatus>>,
}

impl VisitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node's status, `Unvisited` if it was never seen
    pub fn status(&self, node: &Url) -> NodeStatus {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(node)
            .copied()
            .unwrap_or(NodeStatus::Unvisited)
    }

    /// Marks an unvisited node as queued for crawling
    ///
    /// Returns false if the node was already quoted, claimed or finished.
    pub fn quote(&self, node: &Url) -> bool {
        self.transition(node, NodeStatus::Quoted)
    }

    /// Hands a node to a worker
    ///
    /// Returns false if another worker already has it or it is finished.
    pub fn claim(&self, node: &Url) -> bool {
        self.transition(node, NodeStatus::InProgress)
    }

    /// Marks a claimed node as successfully crawled
    pub fn complete(&self, node: &Url) -> bool {
        self.transition(node, NodeStatus::Completed)
    }

    /// Marks a claimed node as failed
    pub fn fail(&self, node: &Url) -> bool {
        self.transition(node, NodeStatus::Failed)
    }

    fn transition(&self, node: &Url, next: NodeStatus) -> bool {
        let mut statuses = self.statuses.lock().unwrap_or_else(PoisonError::into_inner);
        let current = statuses
            .get(node)
            .copied()
            .unwrap_or(NodeStatus::Unvisited);

        if !current.can_transition_to(next) {
            tracing::trace!("Ignoring transition {} -> {} for {}", current, next, node);
            return false;
        }

        statuses.insert(node.clone(), next);
        true
    }
}
