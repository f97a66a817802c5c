//! MCP server for papergraph: research sessions and field extraction over
//! the Model Context Protocol.
//!
//! Tools: `research`, `extract_fields`.

pub mod params;

use crate::config::Config;
use crate::pipeline::ResearchPipeline;
use crate::render::{RenderConfig, RenderPayload};
use crate::retrieval::{SearchRequest, SortBy};
use params::*;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ok_text(text: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn err_text(msg: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg)]))
}

fn ok_json<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    match serde_json::to_string_pretty(value) {
        Ok(text) => ok_text(text),
        Err(e) => err_text(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// PaperGraphMcpServer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PaperGraphMcpServer {
    pipeline: Arc<ResearchPipeline>,
    config: Arc<Config>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PaperGraphMcpServer {
    pub fn new(pipeline: Arc<ResearchPipeline>, config: Config) -> Self {
        Self {
            pipeline,
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    fn search_request(&self, p: ResearchParams) -> Result<SearchRequest, String> {
        let sort_by = match p.sort.as_deref() {
            Some(s) => s.parse::<SortBy>()?,
            None => self.config.retrieval.sort_by,
        };
        Ok(SearchRequest::new(p.query)
            .with_max_results(p.max_results.unwrap_or(self.config.retrieval.max_results))
            .with_sort(sort_by))
    }

    fn render_config(&self) -> &RenderConfig {
        &self.config.render
    }

    #[tool(
        description = "Search arXiv, extract Problem/Method/Results/Limitations for each paper, and return the paper/concept graph"
    )]
    async fn research(
        &self,
        Parameters(p): Parameters<ResearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let request = match self.search_request(p) {
            Ok(r) => r,
            Err(e) => return err_text(e),
        };
        let session = self.pipeline.run(&request).await;
        let payload = RenderPayload::from_graph(&session.graph, self.render_config());

        ok_json(&serde_json::json!({
            "query": session.query,
            "summaries": session.summaries,
            "warnings": session.warnings,
            "graph": payload,
        }))
    }

    #[tool(description = "Extract Problem/Method/Results/Limitations from a single abstract")]
    async fn extract_fields(
        &self,
        Parameters(p): Parameters<ExtractFieldsParams>,
    ) -> Result<CallToolResult, McpError> {
        let fields = self.pipeline.extractor().extract_fields(&p.abstract_text).await;
        ok_json(&fields)
    }
}

#[tool_handler]
impl ServerHandler for PaperGraphMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "papergraph MCP server: search papers, summarize them into four fields, and link shared concepts"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run_mcp_server(config: Config) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {}", e);
            return 1;
        }
    };

    rt.block_on(async {
        let pipeline = match ResearchPipeline::from_config(&config).await {
            Ok(p) => p,
            Err(e) => {
                eprintln!("failed to set up pipeline: {}", e);
                return 1;
            }
        };

        let server = PaperGraphMcpServer::new(Arc::new(pipeline), config);

        tracing::info!("papergraph mcp server starting on stdio");

        let service = match server.serve(rmcp::transport::stdio()).await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("failed to start MCP server: {}", e);
                return 1;
            }
        };

        if let Err(e) = service.waiting().await {
            eprintln!("MCP server error: {}", e);
            return 1;
        }

        0
    })
}
