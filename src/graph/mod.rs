//! Core graph data structures

mod builder;
mod edge;
mod knowledge;
mod node;


pub use builder::{build_graph, build_graph_with, GraphOptions};
pub use edge::Edge;
pub use knowledge::{GraphError, GraphResult, KnowledgeGraph};
pub use node::{concept_identity, Node, NodeId, NodeKind, PAPER_MARKER};
