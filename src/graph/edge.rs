//! Undirected paper–concept edges

use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// An undirected edge between a paper node and a concept node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub paper: NodeId,
    pub concept: NodeId,
}

impl Edge {
    pub fn new(paper: NodeId, concept: NodeId) -> Self {
        Self { paper, concept }
    }

    /// Order-independent key used for deduplication.
    pub fn key(&self) -> (NodeId, NodeId) {
        unordered(self.paper, self.concept)
    }

    /// The endpoint opposite `node`, if `node` is an endpoint.
    pub fn other(&self, node: &NodeId) -> Option<NodeId> {
        if *node == self.paper {
            Some(self.concept)
        } else if *node == self.concept {
            Some(self.paper)
        } else {
            None
        }
    }
}

pub(crate) fn unordered(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
