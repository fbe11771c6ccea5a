//! Writing session state.
//!
//! The state is a plain value: handlers take the current state and return the next one, so a
//! host can keep it in memory, in a cookie, or in a database row as JSON.

use crate::config::ComposeConfig;
use crate::error::ComposeError;
use revision_core_doc::{DocumentKind, outline, word_count};
use serde::{Deserialize, Serialize};

/// Everything a session needs between turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    /// Accepted responses, trimmed, oldest first.
    pub responses: Vec<String>,
    /// The question the user is answering.
    pub current_question: String,
    /// Latest document preview (empty until the first preview).
    pub document_preview: String,
    /// Word count of the response being typed.
    pub draft_word_count: usize,
    /// Inferred document kind.
    pub document_kind: DocumentKind,
    /// Section the user is working on.
    pub current_section: String,
    /// Message of the last non-fatal failure, cleared on the next accepted turn.
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&ComposeConfig::default())
    }
}

impl SessionState {
    /// A fresh session showing the configured initial question.
    pub fn new(config: &ComposeConfig) -> Self {
        Self {
            responses: Vec::new(),
            current_question: config.initial_question.clone(),
            document_preview: String::new(),
            draft_word_count: 0,
            document_kind: DocumentKind::General,
            current_section: default_section(DocumentKind::General).to_string(),
            last_error: None,
        }
    }

    /// Update the live word count for the response being typed.
    pub fn set_draft(&mut self, draft: &str) {
        self.draft_word_count = word_count(draft);
    }

    /// Returns `true` if the draft may be submitted.
    pub fn can_submit(&self, config: &ComposeConfig) -> bool {
        !self.responses.is_empty() || self.draft_word_count >= config.min_first_response_words
    }

    /// Responses still needed before a preview is generated.
    pub fn responses_until_preview(&self, config: &ComposeConfig) -> usize {
        config
            .preview_after_responses
            .saturating_sub(self.responses.len())
    }

    /// Returns `true` once enough responses exist for a preview.
    pub fn preview_ready(&self, config: &ComposeConfig) -> bool {
        self.responses_until_preview(config) == 0
    }

    /// Placeholder text for the preview pane.
    pub fn preview_status(&self, config: &ComposeConfig) -> String {
        if !self.document_preview.is_empty() {
            return self.document_preview.clone();
        }
        if let Some(error) = &self.last_error {
            return error.clone();
        }
        match self.responses_until_preview(config) {
            0 => "Loading your document...".to_string(),
            remaining => format!(
                "Your document preview will appear after you submit {remaining} more responses."
            ),
        }
    }

    /// All responses joined by newlines, as sent to the generator.
    pub fn joined_responses(&self) -> String {
        self.responses.join("\n")
    }

    /// Check a response against the turn rules and return it trimmed.
    pub fn validate_response(
        &self,
        response: &str,
        config: &ComposeConfig,
    ) -> Result<String, ComposeError> {
        let response = response.trim();
        if response.is_empty() {
            return Err(ComposeError::Validation(
                "Please enter a response.".to_string(),
            ));
        }
        if self.responses.is_empty() && word_count(response) < config.min_first_response_words {
            return Err(ComposeError::Validation(format!(
                "Your response must be at least {} words. Please try again.",
                config.min_first_response_words
            )));
        }
        let total: usize = self
            .responses
            .iter()
            .map(|r| r.chars().count())
            .sum::<usize>()
            + response.chars().count();
        if total > config.max_document_chars {
            return Err(ComposeError::Validation(format!(
                "Your writing exceeds the {} character limit.",
                config.max_document_chars
            )));
        }
        Ok(response.to_string())
    }
}

/// First section of a kind's outline.
pub(crate) fn default_section(kind: DocumentKind) -> &'static str {
    outline(kind).first().copied().unwrap_or("Main")
}
