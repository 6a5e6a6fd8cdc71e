/// Node status definitions for tracking crawl progress
///
/// A node moves `Unvisited -> Quoted -> InProgress -> Completed | Failed`.
/// `Quoted` may be skipped when a node is claimed directly.
use std::fmt;

/// Represents the current state of a node in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    // ===== Active States =====
    /// Node has not been seen as a crawl target yet
    Unvisited,

    /// Node has been discovered and is waiting for a worker
    Quoted,

    /// Node is currently being fetched and parsed
    InProgress,

    // ===== Terminal States =====
    /// Node was fetched and its links recorded
    Completed,

    /// Node fetch or parse failed
    Failed,
}

impl NodeStatus {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: NodeStatus) -> bool {
        matches!(
            (self, next),
            (Self::Unvisited, Self::Quoted)
                | (Self::Unvisited, Self::InProgress)
                | (Self::Quoted, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvisited => "unvisited",
            Self::Quoted => "quoted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible node states
    pub fn all_states() -> [Self; 5] {
        [
            Self::Unvisited,
            Self::Quoted,
            Self::InProgress,
            Self::Completed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
