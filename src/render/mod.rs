//! Render adapter: knowledge graph → renderer node/edge schema
//!
//! The adapter owns label truncation and kind-based styling. Layout and
//! drawing belong to a [`GraphRenderer`] implementation.

mod html;
mod json;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;

use crate::graph::{KnowledgeGraph, NodeKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Appended to truncated labels
pub const ELLIPSIS: &str = "...";

/// Errors from rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Label, style and output settings for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Labels longer than this many characters are cut and get an ellipsis
    pub max_label_length: usize,
    pub paper_color: String,
    pub concept_color: String,
    pub height: String,
    pub width: String,
    pub background: String,
    pub font_color: String,
    /// Where to write the artifact; renderers pick a default when unset
    pub output: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_label_length: 80,
            paper_color: "lightblue".to_string(),
            concept_color: "lightgreen".to_string(),
            height: "600px".to_string(),
            width: "100%".to_string(),
            background: "white".to_string(),
            font_color: "black".to_string(),
            output: None,
        }
    }
}

impl RenderConfig {
    pub fn color_for(&self, kind: NodeKind) -> &str {
        match kind {
            NodeKind::Paper => &self.paper_color,
            NodeKind::Concept => &self.concept_color,
        }
    }
}

/// Renderer-facing node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderNode {
    /// Node key
    #[serde(rename = "id")]
    pub identity: String,
    pub label: String,
    /// Full identity string, shown on inspection
    #[serde(rename = "title")]
    pub tooltip: String,
    #[serde(rename = "color")]
    pub color_class: String,
}

/// Renderer-facing edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEdge {
    pub from: String,
    pub to: String,
}

/// Everything a renderer receives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderPayload {
    /// Map every node and edge of `graph` into the renderer schema.
    pub fn from_graph(graph: &KnowledgeGraph, config: &RenderConfig) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| RenderNode {
                identity: node.id.to_string(),
                label: truncate_label(&node.identity, config.max_label_length),
                tooltip: node.identity.clone(),
                color_class: config.color_for(node.kind).to_string(),
            })
            .collect();
        let edges = graph
            .edges()
            .map(|edge| RenderEdge {
                from: edge.paper.to_string(),
                to: edge.concept.to_string(),
            })
            .collect();
        Self { nodes, edges }
    }
}

/// Output format of a rendered artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Html,
    Json,
}

/// The rendered graph, and where it was written if anywhere
#[derive(Debug, Clone)]
pub struct RenderArtifact {
    pub format: ArtifactFormat,
    pub path: Option<PathBuf>,
    pub content: String,
}

/// Turns a render payload into a visual artifact.
pub trait GraphRenderer {
    fn render(
        &self,
        payload: &RenderPayload,
        config: &RenderConfig,
    ) -> Result<RenderArtifact, RenderError>;
}

/// Map `graph` into the renderer schema and hand it to `renderer`.
pub fn render(
    graph: &KnowledgeGraph,
    config: &RenderConfig,
    renderer: &dyn GraphRenderer,
) -> Result<RenderArtifact, RenderError> {
    let payload = RenderPayload::from_graph(graph, config);
    tracing::debug!(
        nodes = payload.nodes.len(),
        edges = payload.edges.len(),
        "rendering knowledge graph"
    );
    renderer.render(&payload, config)
}

/// Cut `identity` to `max_chars` characters plus [`ELLIPSIS`] when longer.
pub fn truncate_label(identity: &str, max_chars: usize) -> String {
    match identity.char_indices().nth(max_chars) {
        None => identity.to_string(),
        Some((cut, _)) => format!("{}{}", &identity[..cut], ELLIPSIS),
    }
}

pub(crate) fn write_artifact(path: &Path, content: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}
