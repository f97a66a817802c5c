//! KnowledgeGraph: the bipartite paper/concept graph for one search

use super::edge::{unordered, Edge};
use super::node::{Node, NodeId, NodeKind};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors from direct graph mutation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("edge {0} -- {1} does not join a paper to a concept")]
    NotBipartite(NodeId, NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Undirected bipartite graph of papers and their extracted concepts.
///
/// Nodes and edges keep insertion order. Inserting a node whose key already
/// exists reuses the existing node; inserting an edge that already exists
/// (in either direction) is a no-op.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KnowledgeGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
    #[serde(skip)]
    edge_keys: HashSet<(NodeId, NodeId)>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or reuse the node already stored under its key.
    pub fn insert_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        if !self.index.contains_key(&id) {
            self.index.insert(id, self.nodes.len());
            self.nodes.push(node);
        }
        id
    }

    /// Connect a paper node to a concept node.
    ///
    /// Returns `Ok(false)` if the edge already existed.
    pub fn insert_edge(&mut self, a: NodeId, b: NodeId) -> GraphResult<bool> {
        let kind_a = self.get_node(&a).ok_or(GraphError::NodeNotFound(a))?.kind;
        let kind_b = self.get_node(&b).ok_or(GraphError::NodeNotFound(b))?.kind;
        match (kind_a, kind_b) {
            (NodeKind::Paper, NodeKind::Concept) => Ok(self.attach(a, b)),
            (NodeKind::Concept, NodeKind::Paper) => Ok(self.attach(b, a)),
            _ => Err(GraphError::NotBipartite(a, b)),
        }
    }

    /// Record an edge whose endpoints are already known to be a paper and a concept.
    pub(crate) fn attach(&mut self, paper: NodeId, concept: NodeId) -> bool {
        if !self.edge_keys.insert(unordered(paper, concept)) {
            return false;
        }
        self.edges.push(Edge::new(paper, concept));
        true
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Find the first node whose display identity equals `identity`.
    pub fn find_by_identity(&self, identity: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.identity == identity)
    }

    pub fn contains_edge(&self, a: &NodeId, b: &NodeId) -> bool {
        self.edge_keys.contains(&unordered(*a, *b))
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Nodes adjacent to `id`, in edge insertion order.
    pub fn neighbors<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
        self.edges
            .iter()
            .filter_map(move |e| e.other(id))
            .filter_map(move |other| self.get_node(&other))
    }

    pub fn degree(&self, id: &NodeId) -> usize {
        self.edges.iter().filter(|e| e.other(id).is_some()).count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FieldName;

    #[test]
    fn reinserting_a_node_reuses_it() {
        let mut graph = KnowledgeGraph::new();
        let a = graph.insert_node(Node::paper("A"));
        let again = graph.insert_node(Node::paper("A"));
        assert_eq!(a, again);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn edges_deduplicate_in_either_direction() {
        let mut graph = KnowledgeGraph::new();
        let paper = graph.insert_node(Node::paper("A"));
        let concept = graph.insert_node(Node::concept(FieldName::Problem, "p"));

        assert_eq!(graph.insert_edge(paper, concept), Ok(true));
        assert_eq!(graph.insert_edge(concept, paper), Ok(false));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge(&concept, &paper));

        let edge = graph.edges().next().unwrap();
        assert_eq!((edge.paper, edge.concept), (paper, concept));
    }

    #[test]
    fn same_kind_edges_are_rejected() {
        let mut graph = KnowledgeGraph::new();
        let a = graph.insert_node(Node::paper("A"));
        let b = graph.insert_node(Node::paper("B"));
        assert_eq!(graph.insert_edge(a, b), Err(GraphError::NotBipartite(a, b)));

        let p = graph.insert_node(Node::concept(FieldName::Method, "m"));
        let q = graph.insert_node(Node::concept(FieldName::Results, "r"));
        assert!(graph.insert_edge(p, q).is_err());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn edge_to_missing_node_is_rejected() {
        let mut graph = KnowledgeGraph::new();
        let a = graph.insert_node(Node::paper("A"));
        let ghost = Node::concept(FieldName::Problem, "ghost").id;
        assert_eq!(graph.insert_edge(a, ghost), Err(GraphError::NodeNotFound(ghost)));
    }

    #[test]
    fn neighbors_and_degree() {
        let mut graph = KnowledgeGraph::new();
        let a = graph.insert_node(Node::paper("A"));
        let b = graph.insert_node(Node::paper("B"));
        let shared = graph.insert_node(Node::concept(FieldName::Problem, "shared"));
        graph.insert_edge(a, shared).unwrap();
        graph.insert_edge(b, shared).unwrap();

        assert_eq!(graph.degree(&shared), 2);
        assert_eq!(graph.degree(&a), 1);
        let names: Vec<&str> = graph.neighbors(&shared).map(|n| n.identity.as_str()).collect();
        assert_eq!(names, vec!["📄 A", "📄 B"]);
    }

    #[test]
    fn serializes_nodes_and_edges_only() {
        let mut graph = KnowledgeGraph::new();
        let a = graph.insert_node(Node::paper("A"));
        let c = graph.insert_node(Node::concept(FieldName::Limitations, "l"));
        graph.insert_edge(a, c).unwrap();

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["edges"].as_array().unwrap().len(), 1);
        assert_eq!(json["nodes"][0]["kind"], "paper");
        assert!(json.get("index").is_none());
    }
}
