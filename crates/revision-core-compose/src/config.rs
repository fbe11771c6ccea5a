//! Compose configuration.

use crate::error::ConfigError;
use revision_core::DiffOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Question shown before the user has written anything.
pub const DEFAULT_INITIAL_QUESTION: &str = "What would you like to write about? This can be an essay, a document, an email, or anything you like. Start with a few sentences and we can take it from there.";

/// Top-level configuration. Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Minimum word count of the first response.
    pub min_first_response_words: usize,
    /// Number of responses before a document preview is generated.
    pub preview_after_responses: usize,
    /// Question shown at the start of a session.
    pub initial_question: String,
    /// Maximum accepted document size, in characters.
    pub max_document_chars: usize,
    /// Model used for feedback questions.
    pub question: ModelSettings,
    /// Model used for document previews.
    pub preview: ModelSettings,
    /// Diff engine settings.
    pub diff: DiffSettings,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            min_first_response_words: 10,
            preview_after_responses: 5,
            initial_question: DEFAULT_INITIAL_QUESTION.to_string(),
            max_document_chars: 200_000,
            question: ModelSettings::new("claude-3-haiku-20240307"),
            preview: ModelSettings::new("claude-sonnet-4-20250514"),
            diff: DiffSettings::default(),
        }
    }
}

/// Model name and token limit for one kind of generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model identifier passed to the backend.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl ModelSettings {
    /// Settings for `model` with the default token limit.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 1024,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self::new("claude-3-haiku-20240307")
    }
}

/// Serializable subset of [`DiffOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffSettings {
    /// See [`DiffOptions::line_mode_threshold`].
    pub line_mode_threshold: Option<usize>,
    /// See [`DiffOptions::edit_budget`].
    pub edit_budget: Option<usize>,
}

impl Default for DiffSettings {
    fn default() -> Self {
        let options = DiffOptions::default();
        Self {
            line_mode_threshold: options.line_mode_threshold,
            edit_budget: options.edit_budget,
        }
    }
}

impl DiffSettings {
    /// Engine options for these settings (semantic cleanup always on).
    pub fn options(&self) -> DiffOptions {
        DiffOptions {
            line_mode_threshold: self.line_mode_threshold,
            edit_budget: self.edit_budget,
            ..DiffOptions::default()
        }
    }
}

impl ComposeConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview_after_responses == 0 {
            return Err(ConfigError::Invalid(
                "preview_after_responses must be at least 1".to_string(),
            ));
        }
        if self.max_document_chars == 0 {
            return Err(ConfigError::Invalid(
                "max_document_chars must be at least 1".to_string(),
            ));
        }
        for (name, settings) in [("question", &self.question), ("preview", &self.preview)] {
            if settings.model.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name}.model must not be empty")));
            }
            if settings.max_tokens == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name}.max_tokens must be at least 1"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(
            ComposeConfig::from_json_str("{}").unwrap(),
            ComposeConfig::default()
        );
    }

    #[test]
    fn test_partial_override() {
        let config = ComposeConfig::from_json_str(
            r#"{"preview_after_responses": 3, "preview": {"max_tokens": 256}, "diff": {"edit_budget": 500}}"#,
        )
        .unwrap();
        assert_eq!(config.preview_after_responses, 3);
        assert_eq!(config.preview.max_tokens, 256);
        assert_eq!(config.min_first_response_words, 10);
        assert_eq!(config.diff.edit_budget, Some(500));
        assert_eq!(config.diff.line_mode_threshold, Some(100));
        assert_eq!(config.diff.options().edit_budget, Some(500));
    }

    #[test]
    fn test_diff_budget_is_bounded_by_default() {
        let config = ComposeConfig::default();
        assert_eq!(
            config.diff.options().edit_budget,
            Some(revision_core::DEFAULT_EDIT_BUDGET)
        );

        let exact = ComposeConfig::from_json_str(r#"{"diff": {"edit_budget": null}}"#).unwrap();
        assert_eq!(exact.diff.options().edit_budget, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ComposeConfig::from_json_str(r#"{"preview_after_responses": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ComposeConfig::from_json_str(r#"{"question": {"model": " "}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ComposeConfig::from_json_str("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ComposeConfig::load("/nonexistent/revision-compose.json").unwrap();
        assert_eq!(config, ComposeConfig::default());
    }
}
