//! Field extractor: four independent summarization requests per abstract

use super::field::{ExtractedFields, FieldName, FieldOutcome};
use crate::summarizer::{Summarizer, SummarizerConfig};
use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

const TASK_ABORTED: &str = "extraction task aborted";

/// Output-length bounds and scheduling for field extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub min_length: usize,
    pub max_length: usize,
    /// Issue the four field requests as concurrent tasks
    pub parallel_fields: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_length: 30,
            max_length: 100,
            parallel_fields: true,
        }
    }
}

impl From<&SummarizerConfig> for ExtractorConfig {
    fn from(config: &SummarizerConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            parallel_fields: config.parallel_fields,
        }
    }
}

/// Extracts Problem/Method/Results/Limitations from an abstract.
///
/// A failing request only affects its own field; extraction as a whole
/// never fails.
pub struct FieldExtractor {
    summarizer: Arc<dyn Summarizer>,
    config: ExtractorConfig,
}

impl FieldExtractor {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            summarizer,
            config: ExtractorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract all four fields from raw abstract text.
    ///
    /// Every request runs as its own task, so an error or a panic inside the
    /// summarizer only fails that field.
    pub async fn extract_fields(&self, abstract_text: &str) -> ExtractedFields {
        let text: Arc<str> = Arc::from(normalize(abstract_text));
        let mut slots: [Option<FieldOutcome>; 4] = Default::default();

        if self.config.parallel_fields {
            self.run_concurrently(text, &mut slots).await;
        } else {
            for field in FieldName::ALL {
                let outcome = match tokio::spawn(self.field_task(field, Arc::clone(&text))).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(%field, error = %e, "field extraction task did not complete");
                        FieldOutcome::failed(TASK_ABORTED)
                    }
                };
                slots[field.index()] = Some(outcome);
            }
        }

        ExtractedFields::from_fn(|field| {
            slots[field.index()]
                .take()
                .unwrap_or_else(|| FieldOutcome::failed(TASK_ABORTED))
        })
    }

    fn field_task(
        &self,
        field: FieldName,
        text: Arc<str>,
    ) -> impl Future<Output = FieldOutcome> + Send + 'static {
        let summarizer = Arc::clone(&self.summarizer);
        let (min_length, max_length) = (self.config.min_length, self.config.max_length);
        async move { request_field(summarizer.as_ref(), field, &text, min_length, max_length).await }
    }

    async fn run_concurrently(&self, text: Arc<str>, slots: &mut [Option<FieldOutcome>; 4]) {
        let mut tasks = JoinSet::new();
        for field in FieldName::ALL {
            let task = self.field_task(field, Arc::clone(&text));
            tasks.spawn(async move { (field, task.await) });
        }

        // Completion order is arbitrary; slots are indexed by field.
        // A panicked task leaves its slot empty.
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((field, outcome)) => slots[field.index()] = Some(outcome),
                Err(e) => warn!(error = %e, "field extraction task did not complete"),
            }
        }
    }
}

async fn request_field(
    summarizer: &dyn Summarizer,
    field: FieldName,
    normalized_abstract: &str,
    min_length: usize,
    max_length: usize,
) -> FieldOutcome {
    let prompt = field.prompt(normalized_abstract);
    debug!(%field, prompt_chars = prompt.len(), "requesting field summary");

    let outcome =
        FieldOutcome::from_response(summarizer.summarize(&prompt, min_length, max_length).await);
    if let FieldOutcome::Failed(failure) = &outcome {
        warn!(%field, reason = %failure.reason, "field extraction failed");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FAILURE_PLACEHOLDER;
    use crate::summarizer::{MockSummarizer, SummarizeError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    fn field_of(prompt: &str) -> FieldName {
        FieldName::ALL
            .into_iter()
            .find(|f| prompt.starts_with(f.instruction()))
            .unwrap()
    }

    /// Answers later fields first: Problem waits longest.
    #[derive(Default)]
    struct ReverseDelaySummarizer {
        finished: Mutex<Vec<FieldName>>,
    }

    #[async_trait]
    impl Summarizer for ReverseDelaySummarizer {
        async fn summarize(&self, prompt: &str, _: usize, _: usize) -> Result<String, SummarizeError> {
            let field = field_of(prompt);
            let wait = 10 * (4 - field.index() as u64);
            tokio::time::sleep(Duration::from_millis(wait)).await;
            self.finished.lock().unwrap().push(field);
            Ok(format!("{} summary", field))
        }
    }

    /// Panics while summarizing the Method field.
    struct PanicsOnMethod;

    #[async_trait]
    impl Summarizer for PanicsOnMethod {
        async fn summarize(&self, prompt: &str, _: usize, _: usize) -> Result<String, SummarizeError> {
            if field_of(prompt) == FieldName::Method {
                panic!("model crashed");
            }
            Ok("Fine.".to_string())
        }
    }

    fn extractor(mock: MockSummarizer, parallel: bool) -> (Arc<MockSummarizer>, FieldExtractor) {
        let mock = Arc::new(mock);
        let extractor = FieldExtractor::new(mock.clone()).with_config(ExtractorConfig {
            parallel_fields: parallel,
            ..Default::default()
        });
        (mock, extractor)
    }

    fn per_field_mock() -> MockSummarizer {
        MockSummarizer::new()
            .with_response(FieldName::Problem.instruction(), "The problem.")
            .with_response(FieldName::Method.instruction(), "The method.")
            .with_response(FieldName::Results.instruction(), "The results.")
            .with_response(FieldName::Limitations.instruction(), "The limitations.")
    }

    #[tokio::test]
    async fn extracts_all_four_fields_in_order() {
        for parallel in [true, false] {
            let (_, extractor) = extractor(per_field_mock(), parallel);
            let fields = extractor.extract_fields("Some abstract.").await;

            let texts: Vec<(FieldName, &str)> =
                fields.iter().map(|(f, o)| (f, o.text())).collect();
            assert_eq!(
                texts,
                vec![
                    (FieldName::Problem, "The problem."),
                    (FieldName::Method, "The method."),
                    (FieldName::Results, "The results."),
                    (FieldName::Limitations, "The limitations."),
                ]
            );
        }
    }

    #[tokio::test]
    async fn single_failure_is_scoped_to_its_field() {
        let mock = MockSummarizer::new()
            .with_failure(FieldName::Method.instruction(), "model overloaded")
            .with_fallback("Fine.");
        let (_, extractor) = extractor(mock, true);

        let fields = extractor.extract_fields("Abstract.").await;

        assert_eq!(fields.failed_count(), 1);
        assert!(fields.get(FieldName::Method).is_failed());
        assert_eq!(fields.get(FieldName::Method).text(), FAILURE_PLACEHOLDER);
        assert_eq!(fields.get(FieldName::Problem).text(), "Fine.");
        assert_eq!(fields.get(FieldName::Limitations).text(), "Fine.");
    }

    #[tokio::test]
    async fn empty_abstract_still_yields_four_entries() {
        let (_, extractor) = extractor(MockSummarizer::new(), false);
        let fields = extractor.extract_fields("").await;

        assert_eq!(fields.iter().count(), 4);
        assert_eq!(fields.failed_count(), 4);
    }

    #[tokio::test]
    async fn empty_response_maps_to_failure() {
        let mock = MockSummarizer::new().with_fallback("   ");
        let (_, extractor) = extractor(mock, true);
        let fields = extractor.extract_fields("Abstract.").await;
        assert_eq!(fields.failed_count(), 4);
    }

    #[tokio::test]
    async fn prompts_carry_normalized_abstract_and_length_bounds() {
        let mock = Arc::new(MockSummarizer::new().with_fallback("ok"));
        let extractor = FieldExtractor::new(mock.clone()).with_config(ExtractorConfig {
            min_length: 12,
            max_length: 48,
            parallel_fields: false,
        });

        extractor.extract_fields("  Line one\n\n line   two ").await;

        let calls = mock.calls();
        assert_eq!(calls.len(), 4);
        for (call, field) in calls.iter().zip(FieldName::ALL) {
            assert_eq!(call.prompt, field.prompt("Line one line two"));
            assert_eq!((call.min_length, call.max_length), (12, 48));
        }
    }

    #[tokio::test]
    async fn out_of_order_completion_is_reassembled_in_field_order() {
        let summarizer = Arc::new(ReverseDelaySummarizer::default());
        let extractor = FieldExtractor::new(summarizer.clone());

        let fields = extractor.extract_fields("Abstract.").await;

        let mut finished = summarizer.finished.lock().unwrap().clone();
        assert_eq!(finished.first(), Some(&FieldName::Limitations));
        assert_eq!(finished.last(), Some(&FieldName::Problem));
        finished.sort();
        assert_eq!(finished, FieldName::ALL.to_vec());

        let texts: Vec<String> = fields.iter().map(|(_, o)| o.text().to_string()).collect();
        assert_eq!(
            texts,
            vec![
                "Problem summary",
                "Method summary",
                "Results summary",
                "Limitations summary"
            ]
        );
    }

    #[tokio::test]
    async fn panicking_summarizer_fails_only_its_field() {
        for parallel in [true, false] {
            let extractor = FieldExtractor::new(Arc::new(PanicsOnMethod)).with_config(ExtractorConfig {
                parallel_fields: parallel,
                ..Default::default()
            });

            let fields = extractor.extract_fields("Abstract.").await;

            assert_eq!(fields.failed_count(), 1, "parallel_fields = {}", parallel);
            assert!(fields.get(FieldName::Method).is_failed());
            assert_eq!(fields.get(FieldName::Method).text(), FAILURE_PLACEHOLDER);
            assert_eq!(fields.get(FieldName::Results).text(), "Fine.");
        }
    }
}
