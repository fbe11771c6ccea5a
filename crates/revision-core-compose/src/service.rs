//! Request handlers.
//!
//! [`ComposeService`] wires a [`RevisionStore`] and a [`Generator`] to the attribution engine.
//! Every handler takes a wire DTO and returns a wire DTO or a [`ComposeError`]; transports map
//! errors through [`ComposeError::status_code`] and [`ErrorResponse`].

use crate::config::ComposeConfig;
use crate::error::ComposeError;
use crate::generation::{Generator, PromptContext, prompts};
use crate::session::{SessionState, default_section};
use crate::store::{RevisionId, RevisionStore};
use revision_core::{
    AttributionSummary, DiffSpan, OffsetUnit, Origin, build_diff_spans_with, convert_spans,
};
use revision_core_doc::{DocumentKind, classify, next_section};
use serde::{Deserialize, Serialize};

/// `POST /revision` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRevisionRequest {
    /// Document id.
    pub doc_id: String,
    /// Full document content.
    pub content: String,
    /// Who produced the content.
    pub source: Origin,
}

/// `POST /revision` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRevisionResponse {
    /// Id of the new revision.
    pub revision_id: RevisionId,
}

/// `GET /revision/{id}/diff` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffQuery {
    /// Revision to compare against; the parent revision when absent.
    pub against: Option<RevisionId>,
    /// Unit of the returned offsets.
    pub offsets: OffsetUnit,
}

/// `POST /generate-question` and `POST /generate-preview` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    /// The user's responses so far.
    pub responses: Vec<String>,
    /// Document type label; `general` when absent.
    pub document_type: Option<String>,
    /// Current section label; `main` when absent.
    pub current_section: Option<String>,
}

/// `POST /generate-question` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    /// Feedback and follow-up question.
    pub question: String,
    /// Document preview generated alongside the question.
    pub document_preview: String,
    /// Resolved document type.
    pub document_type: DocumentKind,
    /// Resolved current section.
    pub current_section: String,
}

/// `POST /generate-preview` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// Structured document preview.
    pub document_preview: String,
    /// Resolved document type.
    pub document_type: DocumentKind,
    /// Resolved current section.
    pub current_section: String,
}

/// `POST /nudge` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeRequest {
    /// Document id.
    pub doc_id: String,
    /// Section the passage belongs to.
    pub section: String,
    /// The passage to question.
    pub user_text: String,
}

/// `POST /nudge` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeResponse {
    /// The Socratic question.
    pub nudge_text: String,
}

/// Error body returned alongside a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}

impl From<&ComposeError> for ErrorResponse {
    fn from(err: &ComposeError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// A generated preview with its attribution against the user's own words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedPreview {
    /// Preview text.
    pub text: String,
    /// Spans over `text`, in chars.
    pub spans: Vec<DiffSpan>,
    /// User/assistant share of `text`.
    pub summary: AttributionSummary,
}

/// Result of one accepted turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    /// The next session state.
    pub state: SessionState,
    /// The new question (also in `state.current_question`).
    pub question: String,
    /// The preview produced this turn, if any.
    pub preview: Option<AttributedPreview>,
}

/// Handlers over an injected store and generator.
#[derive(Debug, Clone)]
pub struct ComposeService<S, G> {
    store: S,
    generator: G,
    config: ComposeConfig,
}

impl<S: RevisionStore, G: Generator> ComposeService<S, G> {
    /// Create a service.
    pub fn new(store: S, generator: G, config: ComposeConfig) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// The revision store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// A fresh session for this service's configuration.
    pub fn new_session(&self) -> SessionState {
        SessionState::new(&self.config)
    }

    /// Persist a revision.
    pub fn save_revision(
        &self,
        request: SaveRevisionRequest,
    ) -> Result<SaveRevisionResponse, ComposeError> {
        if request.doc_id.trim().is_empty() {
            return Err(ComposeError::Validation("docId is required".to_string()));
        }
        self.check_size(&request.content)?;

        let revision_id = self
            .store
            .save(&request.doc_id, &request.content, request.source)?;
        tracing::info!(
            "Saved revision {} of {} ({})",
            revision_id,
            request.doc_id,
            request.source
        );
        Ok(SaveRevisionResponse { revision_id })
    }

    /// Attribute a revision's content against another revision (its parent by default).
    ///
    /// The first revision of a document is compared against empty text, so it is all
    /// attributed to the assistant.
    pub fn revision_diff(
        &self,
        id: &RevisionId,
        query: DiffQuery,
    ) -> Result<Vec<DiffSpan>, ComposeError> {
        let revision = self.store.load(id).inspect_err(|err| {
            tracing::warn!("Diff requested for unknown revision {}: {}", id, err);
        })?;

        let base = match query.against.as_ref().or(revision.parent.as_ref()) {
            Some(base_id) => self.store.load(base_id)?.content,
            None => String::new(),
        };

        let spans = build_diff_spans_with(&base, &revision.content, self.config.diff.options());
        tracing::debug!(
            "Diffed revision {} into {} spans ({:?} offsets)",
            id,
            spans.len(),
            query.offsets
        );
        Ok(convert_spans(&revision.content, &spans, query.offsets))
    }

    /// Feedback question plus a fresh preview.
    pub fn generate_question(
        &self,
        request: GenerateRequest,
    ) -> Result<QuestionResponse, ComposeError> {
        let context = resolve_context(request);
        let question = self.generator.question(&prompts::question(
            &self.config.question,
            context.clone(),
        ))?;
        let document_preview = self.generator.preview(&prompts::preview(
            &self.config.question,
            context.clone(),
        ))?;
        Ok(QuestionResponse {
            question,
            document_preview,
            document_type: context.document_type,
            current_section: context.current_section,
        })
    }

    /// Structured preview; requires at least `preview_after_responses` responses.
    pub fn generate_preview(
        &self,
        request: GenerateRequest,
    ) -> Result<PreviewResponse, ComposeError> {
        let required = self.config.preview_after_responses;
        if request.responses.len() < required {
            let remaining = required - request.responses.len();
            return Err(ComposeError::Validation(format!(
                "Please submit {remaining} more messages to generate your document preview."
            )));
        }

        let context = resolve_context(request);
        let document_preview = self
            .generator
            .preview(&prompts::preview(&self.config.preview, context.clone()))?;
        Ok(PreviewResponse {
            document_preview,
            document_type: context.document_type,
            current_section: context.current_section,
        })
    }

    /// Socratic question about one passage.
    pub fn nudge(&self, request: NudgeRequest) -> Result<NudgeResponse, ComposeError> {
        if request.user_text.trim().is_empty() {
            return Err(ComposeError::Validation("userText is required".to_string()));
        }
        let nudge_text = self.generator.nudge(&prompts::nudge(
            &self.config.question,
            &request.section,
            &request.user_text,
        ))?;
        tracing::debug!("Nudge for {} / {}", request.doc_id, request.section);
        Ok(NudgeResponse { nudge_text })
    }

    /// Accept one response and advance the session.
    ///
    /// Validation and question failures return an error and leave `state` untouched. A preview
    /// failure, including a preview longer than `max_document_chars`, does not fail the turn; it
    /// is recorded in the new state's `last_error`.
    pub fn submit_turn(
        &self,
        state: &SessionState,
        response: &str,
    ) -> Result<Turn, ComposeError> {
        let response = state
            .validate_response(response, &self.config)
            .inspect_err(|err| tracing::warn!("Turn rejected: {}", err))?;

        let mut next = state.clone();
        next.responses.push(response);
        next.draft_word_count = 0;
        next.last_error = None;
        if next.document_kind == DocumentKind::General {
            next.document_kind = classify(&next.joined_responses());
            if next.document_kind != DocumentKind::General {
                next.current_section = default_section(next.document_kind).to_string();
            }
        }

        let context = PromptContext {
            document_type: next.document_kind,
            current_section: next.current_section.clone(),
            responses: next.responses.clone(),
        };
        let question = self
            .generator
            .question(&prompts::question(&self.config.question, context.clone()))
            .inspect_err(|err| tracing::warn!("Question generation failed: {}", err))?;
        next.current_question = question.clone();

        let mut preview = None;
        if next.preview_ready(&self.config) {
            let generated = self
                .generator
                .preview(&prompts::preview(&self.config.preview, context))
                .map_err(ComposeError::from)
                .and_then(|text| self.check_size(&text).map(|()| text));
            match generated {
                Ok(text) => {
                    let spans = build_diff_spans_with(
                        &next.joined_responses(),
                        &text,
                        self.config.diff.options(),
                    );
                    let summary = AttributionSummary::from_spans(&spans);
                    if let Some(section) = next_section(next.document_kind, &text) {
                        next.current_section = section.to_string();
                    }
                    next.document_preview = text.clone();
                    preview = Some(AttributedPreview {
                        text,
                        spans,
                        summary,
                    });
                }
                Err(err) => {
                    tracing::warn!("Preview generation failed: {}", err);
                    next.last_error = Some(err.to_string());
                }
            }
        }

        tracing::info!(
            "Turn {} accepted ({} kind, section {})",
            next.responses.len(),
            next.document_kind,
            next.current_section
        );
        Ok(Turn {
            state: next,
            question,
            preview,
        })
    }

    fn check_size(&self, content: &str) -> Result<(), ComposeError> {
        let len = content.chars().count();
        if len > self.config.max_document_chars {
            return Err(ComposeError::Validation(format!(
                "Document has {} characters; the limit is {}.",
                len, self.config.max_document_chars
            )));
        }
        Ok(())
    }
}

fn resolve_context(request: GenerateRequest) -> PromptContext {
    let document_type = request
        .document_type
        .as_deref()
        .map_or(DocumentKind::General, DocumentKind::from_label);
    let current_section = request
        .current_section
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "main".to_string());
    PromptContext {
        document_type,
        current_section,
        responses: request.responses,
    }
}
