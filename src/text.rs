//! Whitespace normalization for abstract text

/// Collapse every run of whitespace to a single space and trim both ends.
///
/// Casing and punctuation are left untouched. Idempotent.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
