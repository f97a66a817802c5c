//! Configuration: YAML file, environment overrides, defaults

use crate::graph::GraphOptions;
use crate::render::RenderConfig;
use crate::retrieval::RetrievalConfig;
use crate::summarizer::{SummarizerConfig, API_TOKEN_ENV};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration. Every section and field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub retrieval: RetrievalConfig,
    pub summarizer: SummarizerConfig,
    pub graph: GraphOptions,
    pub render: RenderConfig,
}

impl Config {
    /// Default config location (`<config dir>/papergraph/config.yaml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("papergraph").join("config.yaml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if present, otherwise built-in defaults. The `HF_API_TOKEN`
    /// environment variable is applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(default) => Self::from_file(&default)?,
                None => Self::default(),
            },
        };
        config.apply_token_override(std::env::var(API_TOKEN_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading config");
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Replace the API token with `token` when it is set and non-blank.
    pub fn apply_token_override(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.summarizer.api_token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.summarizer;
        if s.min_length > s.max_length {
            return Err(ConfigError::Invalid(format!(
                "summarizer.min_length ({}) exceeds summarizer.max_length ({})",
                s.min_length, s.max_length
            )));
        }
        if s.max_length == 0 {
            return Err(ConfigError::Invalid(
                "summarizer.max_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::SortBy;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.retrieval.max_results, 3);
        assert_eq!(config.retrieval.sort_by, SortBy::SubmittedDate);
        assert_eq!((config.summarizer.min_length, config.summarizer.max_length), (30, 100));
        assert_eq!(config.render.max_label_length, 80);
        assert!(config.graph.share_failed_concepts);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r#"
retrieval:
  max_results: 10
  sort_by: relevance
summarizer:
  model: sshleifer/distilbart-cnn-12-6
graph:
  share_failed_concepts: false
render:
  max_label_length: 40
  output: /tmp/out.html
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.retrieval.max_results, 10);
        assert_eq!(config.retrieval.sort_by, SortBy::Relevance);
        assert_eq!(config.retrieval.timeout_secs, 30);
        assert_eq!(config.summarizer.model, "sshleifer/distilbart-cnn-12-6");
        assert_eq!(config.summarizer.max_length, 100);
        assert!(!config.graph.share_failed_concepts);
        assert_eq!(config.render.max_label_length, 40);
        assert_eq!(config.render.paper_color, "lightblue");
        assert_eq!(config.render.output, Some(PathBuf::from("/tmp/out.html")));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = Config::from_yaml("retrieval: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn token_override_ignores_blank_values() {
        let mut config = Config::from_yaml("summarizer:\n  api_token: from-file\n").unwrap();
        config.apply_token_override(Some("  ".to_string()));
        assert_eq!(config.summarizer.api_token.as_deref(), Some("from-file"));

        config.apply_token_override(Some("from-env".to_string()));
        assert_eq!(config.summarizer.api_token.as_deref(), Some("from-env"));
    }

    #[test]
    fn inverted_length_bounds_are_rejected() {
        let config = Config::from_yaml("summarizer:\n  min_length: 200\n  max_length: 50\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "retrieval:\n  max_results: 7\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.retrieval.max_results, 7);
    }
}
