//! Link graph assembled by a crawl
//!
//! Nodes are sites at host granularity; edges are deduplicated "links to"
//! relationships between them. `Graph` is the plain data structure,
//! `SharedGraph` wraps it for concurrent crawl workers, and `GraphView` is the
//! flattened form served to clients.

mod view;

pub use view::{GraphView, LinkRecord, NodeRecord};

use crate::url::{node_id, node_url};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Type tag carried by every edge
pub const EDGE_TYPE: &str = "link";

/// A crawled site, identified by scheme, host and port
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    url: Url,
}

impl Node {
    /// Creates a node for the site hosting `url`
    pub fn new(url: &Url) -> Self {
        Self { url: node_url(url) }
    }

    /// The normalized URL (`scheme://host[:port]/`)
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Wire identifier, `scheme://host[:port]`
    pub fn id(&self) -> String {
        node_id(&self.url)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Adjacency-list graph with insertion-ordered nodes
///
/// Every node that appears in an edge is also present in the node sequence.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashSet<Node>,
    adjacency: HashMap<Node, Vec<Node>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the node for `url` unless it is already present
    ///
    /// Returns true if the node was new.
    pub fn add_node(&mut self, url: &Url) -> bool {
        let node = Node::new(url);
        if self.index.contains(&node) {
            return false;
        }
        self.index.insert(node.clone());
        self.nodes.push(node);
        true
    }

    /// Inserts both endpoints and the edge `src -> dst` unless it exists
    ///
    /// Returns true if the edge was new.
    pub fn add_edge(&mut self, src: &Url, dst: &Url) -> bool {
        self.add_node(src);
        self.add_node(dst);

        if self.edge_exists(src, dst) {
            return false;
        }

        self.adjacency
            .entry(Node::new(src))
            .or_default()
            .push(Node::new(dst));
        true
    }

    /// Linear scan of `src`'s adjacency list for `dst`
    pub fn edge_exists(&self, src: &Url, dst: &Url) -> bool {
        let target = Node::new(dst);
        self.adjacency
            .get(&Node::new(src))
            .is_some_and(|targets| targets.iter().any(|t| *t == target))
    }

    pub fn contains_node(&self, url: &Url) -> bool {
        self.index.contains(&Node::new(url))
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Targets linked from `src`, in discovery order
    pub fn targets(&self, src: &Url) -> &[Node] {
        self.adjacency
            .get(&Node::new(src))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All edges, grouped by source in node insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&Node, &Node)> {
        self.nodes.iter().flat_map(move |src| {
            self.adjacency
                .get(src)
                .into_iter()
                .flatten()
                .map(move |dst| (src, dst))
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flattens the graph into its serializable form
    pub fn view(&self) -> GraphView {
        GraphView::from(self)
    }
}

/// A `Graph` shared between crawl workers
///
/// Each operation holds the lock for its whole check-then-insert sequence.
#[derive(Debug, Default)]
pub struct SharedGraph {
    inner: Mutex<Graph>,
}

impl SharedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&self, url: &Url) -> bool {
        self.lock().add_node(url)
    }

    pub fn add_edge(&self, src: &Url, dst: &Url) -> bool {
        self.lock().add_edge(src, dst)
    }

    pub fn edge_exists(&self, src: &Url, dst: &Url) -> bool {
        self.lock().edge_exists(src, dst)
    }

    pub fn node_count(&self) -> usize {
        self.lock().node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.lock().edge_count()
    }

    /// Copies the current state of the graph
    pub fn snapshot(&self) -> Graph {
        self.lock().clone()
    }

    /// Consumes the wrapper once all workers are done
    pub fn into_inner(self) -> Graph {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Graph> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
