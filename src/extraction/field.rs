//! Structured-summary types: field names, per-field outcomes, paper summaries

use crate::summarizer::SummarizeError;
use serde::{Deserialize, Serialize};

/// Display text for a field whose extraction did not succeed
pub const FAILURE_PLACEHOLDER: &str = "⚠️ Could not generate summary.";

/// The four extraction categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldName {
    Problem,
    Method,
    Results,
    Limitations,
}

impl FieldName {
    /// All fields in display order
    pub const ALL: [FieldName; 4] = [
        FieldName::Problem,
        FieldName::Method,
        FieldName::Results,
        FieldName::Limitations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Problem => "Problem",
            FieldName::Method => "Method",
            FieldName::Results => "Results",
            FieldName::Limitations => "Limitations",
        }
    }

    /// Instruction text placed in front of the abstract
    pub fn instruction(&self) -> &'static str {
        match self {
            FieldName::Problem => "Summarize the main problem this paper addresses: ",
            FieldName::Method => "Summarize the method or approach used in this paper: ",
            FieldName::Results => "Summarize the results or findings of this paper: ",
            FieldName::Limitations => "Summarize the limitations of this paper: ",
        }
    }

    /// Build the summarization prompt for an already-normalized abstract.
    pub fn prompt(&self, normalized_abstract: &str) -> String {
        format!("{}{}", self.instruction(), normalized_abstract)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub reason: String,
}

impl ExtractionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Result of extracting one field: summary text or a failure marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOutcome {
    Summary(String),
    Failed(ExtractionFailure),
}

impl FieldOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        FieldOutcome::Failed(ExtractionFailure::new(reason))
    }

    /// Map a summarizer response onto an outcome.
    ///
    /// Errors and blank responses both become `Failed`; summaries are trimmed.
    pub fn from_response(response: Result<String, SummarizeError>) -> Self {
        match response {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    FieldOutcome::Failed(ExtractionFailure::new(
                        SummarizeError::EmptyResponse.to_string(),
                    ))
                } else {
                    FieldOutcome::Summary(trimmed.to_string())
                }
            }
            Err(e) => FieldOutcome::Failed(ExtractionFailure::new(e.to_string())),
        }
    }

    /// Text shown for this outcome; failures show the fixed placeholder.
    pub fn text(&self) -> &str {
        match self {
            FieldOutcome::Summary(text) => text,
            FieldOutcome::Failed(_) => FAILURE_PLACEHOLDER,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FieldOutcome::Failed(_))
    }
}

/// One outcome per field, always all four.
///
/// Serializes as a map keyed by field name in display order. Deserializing a
/// map that lacks any of the four keys is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldsRepr", into = "FieldsRepr")]
pub struct ExtractedFields {
    outcomes: [FieldOutcome; 4],
}

impl ExtractedFields {
    pub fn new(
        problem: FieldOutcome,
        method: FieldOutcome,
        results: FieldOutcome,
        limitations: FieldOutcome,
    ) -> Self {
        Self {
            outcomes: [problem, method, results, limitations],
        }
    }

    /// Build the set by computing each field's outcome in display order.
    pub fn from_fn(mut outcome_for: impl FnMut(FieldName) -> FieldOutcome) -> Self {
        Self {
            outcomes: FieldName::ALL.map(|field| outcome_for(field)),
        }
    }

    pub fn get(&self, field: FieldName) -> &FieldOutcome {
        &self.outcomes[field.index()]
    }

    /// Iterate `(field, outcome)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &FieldOutcome)> + '_ {
        FieldName::ALL.into_iter().zip(self.outcomes.iter())
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

#[derive(Serialize, Deserialize)]
struct FieldsRepr {
    #[serde(rename = "Problem")]
    problem: FieldOutcome,
    #[serde(rename = "Method")]
    method: FieldOutcome,
    #[serde(rename = "Results")]
    results: FieldOutcome,
    #[serde(rename = "Limitations")]
    limitations: FieldOutcome,
}

impl From<FieldsRepr> for ExtractedFields {
    fn from(repr: FieldsRepr) -> Self {
        ExtractedFields::new(repr.problem, repr.method, repr.results, repr.limitations)
    }
}

impl From<ExtractedFields> for FieldsRepr {
    fn from(fields: ExtractedFields) -> Self {
        let [problem, method, results, limitations] = fields.outcomes;
        FieldsRepr {
            problem,
            method,
            results,
            limitations,
        }
    }
}

/// Structured summary of one retrieved paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub title: String,
    #[serde(default)]
    pub link: String,
    pub fields: ExtractedFields,
}

impl PaperSummary {
    pub fn new(title: impl Into<String>, fields: ExtractedFields) -> Self {
        Self {
            title: title.into(),
            link: String::new(),
            fields,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_instruction_then_abstract() {
        let prompt = FieldName::Method.prompt("We train a model.");
        assert_eq!(
            prompt,
            "Summarize the method or approach used in this paper: We train a model."
        );
    }

    #[test]
    fn all_is_in_display_order() {
        let names: Vec<&str> = FieldName::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, vec!["Problem", "Method", "Results", "Limitations"]);
    }

    #[test]
    fn blank_response_is_a_failure() {
        let outcome = FieldOutcome::from_response(Ok("   \n".to_string()));
        assert!(outcome.is_failed());
        assert_eq!(outcome.text(), FAILURE_PLACEHOLDER);
    }

    #[test]
    fn summary_response_is_trimmed() {
        let outcome = FieldOutcome::from_response(Ok("  A short summary. ".to_string()));
        assert_eq!(outcome, FieldOutcome::Summary("A short summary.".to_string()));
    }

    #[test]
    fn error_response_keeps_reason() {
        let outcome = FieldOutcome::from_response(Err(SummarizeError::Timeout));
        match outcome {
            FieldOutcome::Failed(failure) => assert!(failure.reason.contains("timed out")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn from_fn_visits_fields_in_order() {
        let mut seen = Vec::new();
        let fields = ExtractedFields::from_fn(|field| {
            seen.push(field);
            FieldOutcome::Summary(field.as_str().to_lowercase())
        });
        assert_eq!(seen, FieldName::ALL.to_vec());
        assert_eq!(fields.get(FieldName::Results).text(), "results");
    }

    #[test]
    fn fields_serialize_as_ordered_map() {
        let fields = ExtractedFields::new(
            FieldOutcome::Summary("p".into()),
            FieldOutcome::failed("boom"),
            FieldOutcome::Summary("r".into()),
            FieldOutcome::Summary("l".into()),
        );
        let json = serde_json::to_string(&fields).unwrap();
        let problem = json.find("\"Problem\"").unwrap();
        let method = json.find("\"Method\"").unwrap();
        let results = json.find("\"Results\"").unwrap();
        let limitations = json.find("\"Limitations\"").unwrap();
        assert!(problem < method && method < results && results < limitations);

        let back: ExtractedFields = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fields);
    }

    #[test]
    fn partial_field_map_is_rejected() {
        let json = r#"{
            "Problem": {"summary": "p"},
            "Method": {"summary": "m"},
            "Results": {"summary": "r"}
        }"#;
        let parsed: Result<ExtractedFields, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }
}
