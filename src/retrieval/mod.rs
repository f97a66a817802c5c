//! Paper retrieval: the search collaborator and its record type

pub mod arxiv;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use arxiv::{parse_atom_feed, ArxivClient, RetrievalConfig};

/// A paper record as returned by a search backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPaper {
    pub title: String,
    pub link: String,
    pub abstract_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

impl RawPaper {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            abstract_text: abstract_text.into(),
            authors: Vec::new(),
            published: None,
        }
    }
}

/// Result ordering requested from the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    SubmittedDate,
    LastUpdatedDate,
    Relevance,
}

impl SortBy {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            SortBy::SubmittedDate => "submittedDate",
            SortBy::LastUpdatedDate => "lastUpdatedDate",
            SortBy::Relevance => "relevance",
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "submitted" | "submitteddate" | "date" => Ok(SortBy::SubmittedDate),
            "updated" | "lastupdated" | "lastupdateddate" => Ok(SortBy::LastUpdatedDate),
            "relevance" => Ok(SortBy::Relevance),
            other => Err(format!(
                "unknown sort order '{}' (expected submitted, updated or relevance)",
                other
            )),
        }
    }
}

/// One search against a paper source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
    pub sort_by: SortBy,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 3,
            sort_by: SortBy::default(),
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Errors from retrieval backends.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("retrieval backend not available: {0}")]
    Unavailable(String),
    #[error("search request failed: {0}")]
    Request(String),
    #[error("search backend returned status {0}")]
    Status(u16),
    #[error("feed parse error: {0}")]
    Parse(String),
}

/// Search backend returning papers in backend order.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Run a search. At most `request.max_results` papers are returned.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPaper>, RetrievalError>;
}

/// Fixed in-memory source for tests and offline runs.
pub struct StaticSource {
    papers: Vec<RawPaper>,
    failure: Option<String>,
}

impl StaticSource {
    pub fn new(papers: Vec<RawPaper>) -> Self {
        Self {
            papers,
            failure: None,
        }
    }

    /// A source whose every search fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            papers: Vec::new(),
            failure: Some(reason.into()),
        }
    }
}

#[async_trait]
impl PaperSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPaper>, RetrievalError> {
        if let Some(reason) = &self.failure {
            return Err(RetrievalError::Unavailable(reason.clone()));
        }
        Ok(self.papers.iter().take(request.max_results).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_by_parses_loose_names() {
        assert_eq!("submitted".parse::<SortBy>().unwrap(), SortBy::SubmittedDate);
        assert_eq!("lastUpdatedDate".parse::<SortBy>().unwrap(), SortBy::LastUpdatedDate);
        assert_eq!("last-updated".parse::<SortBy>().unwrap(), SortBy::LastUpdatedDate);
        assert_eq!("Relevance".parse::<SortBy>().unwrap(), SortBy::Relevance);
        assert!("popularity".parse::<SortBy>().is_err());
    }

    #[tokio::test]
    async fn static_source_honors_max_results() {
        let source = StaticSource::new(vec![
            RawPaper::new("A", "a", "abstract a"),
            RawPaper::new("B", "b", "abstract b"),
        ]);

        let one = source.search(&SearchRequest::new("q").with_max_results(1)).await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].title, "A");

        let none = source.search(&SearchRequest::new("q").with_max_results(0)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn failing_source_reports_unavailable() {
        let source = StaticSource::failing("offline");
        let err = source.search(&SearchRequest::new("q")).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Unavailable(_)));
    }
}
