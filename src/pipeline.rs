//! Research pipeline: search → extract → graph, one session per query

use crate::config::Config;
use crate::extraction::{ExtractorConfig, FieldExtractor, PaperSummary};
use crate::graph::{build_graph_with, GraphOptions, KnowledgeGraph};
use crate::retrieval::{ArxivClient, PaperSource, RawPaper, RetrievalError, SearchRequest};
use crate::summarizer::{self, SummarizeError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors wiring up the live collaborators
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("retrieval client: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("summarizer client: {0}")]
    Summarizer(#[from] SummarizeError),
}

/// Everything one search produced.
///
/// Session-local: nothing here outlives the caller's use of it.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchSession {
    pub query: String,
    pub started_at: DateTime<Utc>,
    /// Summaries in retrieval order
    pub summaries: Vec<PaperSummary>,
    pub graph: KnowledgeGraph,
    /// Degraded-but-visible problems (failed retrieval, blank query)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Runs retrieval, per-paper extraction and graph assembly.
pub struct ResearchPipeline {
    source: Arc<dyn PaperSource>,
    extractor: FieldExtractor,
    graph_options: GraphOptions,
}

impl ResearchPipeline {
    pub fn new(source: Arc<dyn PaperSource>, extractor: FieldExtractor) -> Self {
        Self {
            source,
            extractor,
            graph_options: GraphOptions::default(),
        }
    }

    /// Pipeline backed by arXiv and the shared hosted summarizer.
    pub async fn from_config(config: &Config) -> Result<Self, SetupError> {
        let source = ArxivClient::new(&config.retrieval)?;
        let summarizer = summarizer::shared(&config.summarizer).await?;
        let extractor = FieldExtractor::new(summarizer)
            .with_config(ExtractorConfig::from(&config.summarizer));
        Ok(Self::new(Arc::new(source), extractor).with_graph_options(config.graph.clone()))
    }

    pub fn with_graph_options(mut self, options: GraphOptions) -> Self {
        self.graph_options = options;
        self
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    /// Extract structured summaries for `papers`, one paper at a time, in order.
    pub async fn summarize_papers(&self, papers: &[RawPaper]) -> Vec<PaperSummary> {
        let mut summaries = Vec::with_capacity(papers.len());
        for (i, paper) in papers.iter().enumerate() {
            let fields = self.extractor.extract_fields(&paper.abstract_text).await;
            info!(
                index = i + 1,
                title = %paper.title,
                failed_fields = fields.failed_count(),
                "paper summarized"
            );
            summaries.push(PaperSummary::new(&paper.title, fields).with_link(&paper.link));
        }
        summaries
    }

    /// Run one full search session.
    ///
    /// Never fails: a blank query or a retrieval error yields an empty
    /// session carrying a warning.
    pub async fn run(&self, request: &SearchRequest) -> ResearchSession {
        let started_at = Utc::now();
        let mut warnings = Vec::new();

        let papers = if request.query.trim().is_empty() {
            warnings.push("empty query; nothing searched".to_string());
            Vec::new()
        } else {
            match self.source.search(request).await {
                Ok(papers) => {
                    info!(
                        source = self.source.name(),
                        query = %request.query,
                        papers = papers.len(),
                        "search complete"
                    );
                    papers
                }
                Err(e) => {
                    warn!(source = self.source.name(), error = %e, "search failed");
                    warnings.push(format!("search failed: {}", e));
                    Vec::new()
                }
            }
        };

        let summaries = self.summarize_papers(&papers).await;
        let graph = build_graph_with(&summaries, &self.graph_options);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "session complete"
        );

        ResearchSession {
            query: request.query.clone(),
            started_at,
            summaries,
            graph,
            warnings,
        }
    }
}
