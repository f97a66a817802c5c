//! Shared fixtures for papergraph integration tests
//!
//! Papers and summarizer mocks that reproduce the scenarios the pipeline
//! has to handle: clean extraction, a single failed field, and concepts
//! shared across papers.

#![allow(dead_code)]

use papergraph::{FieldExtractor, FieldName, MockSummarizer, RawPaper, ResearchPipeline, StaticSource};
use std::sync::Arc;

pub fn paper(title: &str, abstract_text: &str) -> RawPaper {
    RawPaper::new(
        title,
        format!("http://arxiv.org/abs/{}", title.to_lowercase().replace(' ', "-")),
        abstract_text,
    )
}

/// Answer `field` for exactly this (already normalized) abstract.
pub fn respond(
    mock: MockSummarizer,
    field: FieldName,
    abstract_text: &str,
    response: &str,
) -> MockSummarizer {
    mock.with_response(field.prompt(abstract_text), response)
}

/// Fail `field` for exactly this abstract.
pub fn fail(mock: MockSummarizer, field: FieldName, abstract_text: &str) -> MockSummarizer {
    mock.with_failure(field.prompt(abstract_text), "inference endpoint returned 503")
}

/// Answer all four fields for one abstract, in display order.
pub fn respond_all(mock: MockSummarizer, abstract_text: &str, responses: [&str; 4]) -> MockSummarizer {
    FieldName::ALL
        .into_iter()
        .zip(responses)
        .fold(mock, |mock, (field, response)| respond(mock, field, abstract_text, response))
}

pub fn pipeline_with(papers: Vec<RawPaper>, mock: MockSummarizer) -> ResearchPipeline {
    let extractor = FieldExtractor::new(Arc::new(mock));
    ResearchPipeline::new(Arc::new(StaticSource::new(papers)), extractor)
}
