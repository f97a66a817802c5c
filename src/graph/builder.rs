//! Graph builder: paper summaries → knowledge graph

use super::knowledge::KnowledgeGraph;
use super::node::Node;
use crate::extraction::{FieldOutcome, PaperSummary};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options controlling concept-node sharing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Merge failed-field placeholders of different papers into one node.
    ///
    /// When false, each paper gets its own placeholder node per failed field.
    pub share_failed_concepts: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            share_failed_concepts: true,
        }
    }
}

/// Build the paper/concept graph with default options.
pub fn build_graph(summaries: &[PaperSummary]) -> KnowledgeGraph {
    build_graph_with(summaries, &GraphOptions::default())
}

/// Build the paper/concept graph.
///
/// Papers are visited in sequence order and their fields in display order.
/// Nodes and edges with the same key are reused, so building twice from the
/// same summaries yields the same graph.
pub fn build_graph_with(summaries: &[PaperSummary], options: &GraphOptions) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new();

    for summary in summaries {
        let paper = graph.insert_node(Node::paper(&summary.title));

        for (field, outcome) in summary.fields.iter() {
            let concept = match outcome {
                FieldOutcome::Failed(_) if !options.share_failed_concepts => {
                    Node::scoped_concept(field, outcome.text(), &summary.title)
                }
                _ => Node::concept(field, outcome.text()),
            };
            let concept = graph.insert_node(concept);
            graph.attach(paper, concept);
        }
    }

    debug!(
        papers = summaries.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "knowledge graph built"
    );
    graph
}
