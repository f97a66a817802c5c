//! MCP tool parameter structs with schemars-derived JSON schemas.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResearchParams {
    #[schemars(description = "Free-text search query")]
    pub query: String,
    #[schemars(description = "Maximum number of papers to retrieve (default from config)")]
    pub max_results: Option<usize>,
    #[schemars(description = "Sort order: 'submitted', 'updated' or 'relevance'")]
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractFieldsParams {
    #[schemars(description = "Paper abstract to extract Problem/Method/Results/Limitations from")]
    pub abstract_text: String,
}
