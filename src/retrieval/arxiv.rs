//! arXiv API client: Atom feed search

use super::{PaperSource, RawPaper, RetrievalError, SearchRequest, SortBy};
use crate::text::normalize;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// arXiv connection and default search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub base_url: String,
    pub max_results: usize,
    pub sort_by: SortBy,
    pub timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://export.arxiv.org/api/query".to_string(),
            max_results: 3,
            sort_by: SortBy::SubmittedDate,
            timeout_secs: 30,
        }
    }
}

/// HTTP client for the arXiv query API.
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(config: &RetrievalConfig) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("papergraph/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RetrievalError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    fn name(&self) -> &str {
        "arxiv"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPaper>, RetrievalError> {
        if request.max_results == 0 {
            return Ok(Vec::new());
        }

        let params = query_params(request);
        debug!(
            query = %request.query,
            max_results = request.max_results,
            sort = request.sort_by.as_api_str(),
            "arXiv search"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| RetrievalError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RetrievalError::Request(e.to_string()))?;

        let mut papers = parse_atom_feed(&body)?;
        papers.truncate(request.max_results);
        Ok(papers)
    }
}

/// Query-string parameters for one search.
///
/// The query goes through as typed, so arXiv's own grammar applies
/// (field prefixes, `AND`/`OR`, quoted phrases).
fn query_params(request: &SearchRequest) -> [(&'static str, String); 5] {
    [
        ("search_query", request.query.trim().to_string()),
        ("start", "0".to_string()),
        ("max_results", request.max_results.to_string()),
        ("sortBy", request.sort_by.as_api_str().to_string()),
        ("sortOrder", "descending".to_string()),
    ]
}

#[derive(Default)]
struct EntryBuilder {
    id: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
}

impl EntryBuilder {
    fn push_text(&mut self, path: &[String], text: &str) {
        let Some(pos) = path.iter().rposition(|name| name == "entry") else {
            return;
        };
        let target = match &path[pos + 1..] {
            [tag] if tag == "id" => &mut self.id,
            [tag] if tag == "title" => &mut self.title,
            [tag] if tag == "summary" => &mut self.summary,
            [tag] if tag == "published" => &mut self.published,
            [author, name] if author == "author" && name == "name" => {
                self.authors.push(normalize(text));
                return;
            }
            _ => return,
        };
        target.push_str(text);
    }

    fn finish(self) -> Option<RawPaper> {
        let title = normalize(&self.title);
        if title.is_empty() {
            return None;
        }
        let published = DateTime::parse_from_rfc3339(self.published.trim())
            .ok()
            .map(|d| d.with_timezone(&Utc));
        Some(RawPaper {
            title,
            link: self.id.trim().to_string(),
            abstract_text: self.summary.trim().to_string(),
            authors: self.authors,
            published,
        })
    }
}

/// Parse an arXiv Atom feed into papers, in feed order.
///
/// Entries without a title are skipped. The abstract keeps its original
/// line breaks; normalization happens at extraction time.
pub fn parse_atom_feed(xml: &str) -> Result<Vec<RawPaper>, RetrievalError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut papers = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut entry: Option<EntryBuilder> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "entry" {
                    entry = Some(EntryBuilder::default());
                }
                path.push(name);
            }
            Ok(Event::End(_)) => {
                if path.pop().as_deref() == Some("entry") {
                    if let Some(paper) = entry.take().and_then(EntryBuilder::finish) {
                        papers.push(paper);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(builder) = entry.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| RetrievalError::Parse(e.to_string()))?;
                    builder.push_text(&path, &text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(builder) = entry.as_mut() {
                    let text = String::from_utf8_lossy(&c).into_owned();
                    builder.push_text(&path, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RetrievalError::Parse(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(papers)
}
