//! Papergraph: paper search, four-field summaries, and a concept graph
//!
//! Papers come back from a retrieval backend, each abstract is summarized
//! into Problem, Method, Results and Limitations, and the summaries are
//! assembled into a bipartite graph of papers and the concepts they share.
//!
//! # Core Concepts
//!
//! - **Papers**: title, link and abstract from a [`PaperSource`]
//! - **Fields**: one [`FieldOutcome`] per [`FieldName`], a summary or a recorded failure
//! - **Graph**: paper nodes linked to concept nodes; identical concepts are one node
//!
//! # Example
//!
//! ```
//! use papergraph::{build_graph, ExtractedFields, FieldOutcome, PaperSummary};
//!
//! let fields = ExtractedFields::from_fn(|f| FieldOutcome::Summary(format!("{} summary", f)));
//! let graph = build_graph(&[PaperSummary::new("A Paper", fields)]);
//! assert_eq!(graph.node_count(), 5);
//! ```

pub mod config;
pub mod extraction;
pub mod graph;
pub mod mcp;
pub mod pipeline;
pub mod render;
pub mod retrieval;
pub mod summarizer;
pub mod text;

pub use config::{Config, ConfigError};
pub use extraction::{
    ExtractedFields, ExtractionFailure, ExtractorConfig, FieldExtractor, FieldName, FieldOutcome,
    PaperSummary, FAILURE_PLACEHOLDER,
};
pub use graph::{
    build_graph, build_graph_with, Edge, GraphError, GraphOptions, GraphResult, KnowledgeGraph,
    Node, NodeId, NodeKind,
};
pub use pipeline::{ResearchPipeline, ResearchSession, SetupError};
pub use render::{
    render, truncate_label, ArtifactFormat, GraphRenderer, HtmlRenderer, JsonRenderer,
    RenderArtifact, RenderConfig, RenderError, RenderPayload,
};
pub use retrieval::{
    ArxivClient, PaperSource, RawPaper, RetrievalConfig, RetrievalError, SearchRequest, SortBy,
    StaticSource,
};
pub use summarizer::{HttpSummarizer, MockSummarizer, SummarizeError, Summarizer, SummarizerConfig};
pub use text::normalize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
