//! Structured extraction of per-paper fields

mod extractor;
mod field;

pub use extractor::{ExtractorConfig, FieldExtractor};
pub use field::{
    ExtractedFields, ExtractionFailure, FieldName, FieldOutcome, PaperSummary,
    FAILURE_PLACEHOLDER,
};
