//! Node representation in the knowledge graph

use crate::extraction::FieldName;
use crate::text::normalize;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marker prepended to a paper title to form its display identity
pub const PAPER_MARKER: &str = "📄 ";

/// Namespace for content-addressed node keys
const NODE_NAMESPACE: Uuid = Uuid::from_u128(0x5f2e_8c1a_93b4_4d27_a6e0_7c3b_19d8_f04e);

/// Content-addressed node key.
///
/// Derived from the node kind and the whitespace-normalized content it
/// stands for, independent of how the node's label is formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Derive the key for `kind` from its identifying parts.
    pub fn derive(kind: NodeKind, parts: &[&str]) -> Self {
        let mut material = String::from(kind.as_str());
        for part in parts {
            // Unit separator keeps ("a b", "c") distinct from ("a", "b c")
            material.push('\u{1f}');
            material.push_str(&normalize(part));
        }
        Self(Uuid::new_v5(&NODE_NAMESPACE, material.as_bytes()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two sides of the bipartite graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Paper,
    Concept,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Paper => "paper",
            NodeKind::Concept => "concept",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the knowledge graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Content-addressed key
    pub id: NodeId,
    pub kind: NodeKind,
    /// Human-readable identity string, e.g. `Method: <summary>`
    pub identity: String,
    /// Source field, for concept nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldName>,
}

impl Node {
    /// Paper node for `title`.
    pub fn paper(title: &str) -> Self {
        Self {
            id: NodeId::derive(NodeKind::Paper, &[title]),
            kind: NodeKind::Paper,
            identity: format!("{}{}", PAPER_MARKER, title),
            field: None,
        }
    }

    /// Concept node for a field value, shared by every paper with the same text.
    pub fn concept(field: FieldName, text: &str) -> Self {
        Self {
            id: NodeId::derive(NodeKind::Concept, &[field.as_str(), text]),
            kind: NodeKind::Concept,
            identity: concept_identity(field, text),
            field: Some(field),
        }
    }

    /// Concept node whose key is scoped to one paper.
    ///
    /// Displays like [`Node::concept`] but never merges with another paper's node.
    pub fn scoped_concept(field: FieldName, text: &str, paper_title: &str) -> Self {
        Self {
            id: NodeId::derive(NodeKind::Concept, &[field.as_str(), text, paper_title]),
            ..Self::concept(field, text)
        }
    }

    pub fn is_paper(&self) -> bool {
        self.kind == NodeKind::Paper
    }
}

/// Display identity of a concept: `<Field>: <text>`.
pub fn concept_identity(field: FieldName, text: &str) -> String {
    format!("{}: {}", field, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_identity_carries_marker() {
        let node = Node::paper("Graph Neural Networks in Healthcare");
        assert_eq!(node.identity, "📄 Graph Neural Networks in Healthcare");
        assert_eq!(node.kind, NodeKind::Paper);
    }

    #[test]
    fn identical_content_yields_identical_keys() {
        assert_eq!(Node::paper("Same").id, Node::paper("Same").id);
        assert_eq!(
            Node::concept(FieldName::Problem, "x").id,
            Node::concept(FieldName::Problem, "x").id
        );
    }

    #[test]
    fn kinds_and_fields_namespace_keys() {
        // A paper titled like a concept string still gets its own key
        let paper = Node::paper("Problem: x");
        let concept = Node::concept(FieldName::Problem, "x");
        assert_ne!(paper.id, concept.id);

        assert_ne!(
            Node::concept(FieldName::Problem, "x").id,
            Node::concept(FieldName::Method, "x").id
        );
    }

    #[test]
    fn part_boundaries_are_significant() {
        assert_ne!(
            NodeId::derive(NodeKind::Concept, &["a b", "c"]),
            NodeId::derive(NodeKind::Concept, &["a", "b c"])
        );
    }

    #[test]
    fn scoped_concept_displays_like_shared_concept() {
        let shared = Node::concept(FieldName::Results, "n/a");
        let scoped = Node::scoped_concept(FieldName::Results, "n/a", "Paper A");
        assert_eq!(shared.identity, scoped.identity);
        assert_ne!(shared.id, scoped.id);
    }

    #[test]
    fn node_id_serializes_as_uuid_string() {
        let id = Node::paper("A").id;
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
