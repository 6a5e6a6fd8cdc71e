//! Serializable view of a `Graph`
//!
//! The in-memory adjacency map is flattened into one record per stored
//! `(source, target)` pair so the wire format stays independent of it.

use crate::graph::{Graph, EDGE_TYPE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// JSON body returned by the query endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

impl From<&Graph> for GraphView {
    fn from(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| NodeRecord { id: node.id() })
            .collect();

        let links = graph
            .edges()
            .map(|(src, dst)| LinkRecord {
                source: src.id(),
                target: dst.id(),
                kind: EDGE_TYPE.to_string(),
            })
            .collect();

        Self { nodes, links }
    }
}
