#![warn(missing_docs)]
//! `revision-core-compose` - writing-session orchestration for `revision-core`.
//!
//! This crate contains the pieces around the attribution engine that a writing assistant needs
//! (configuration, explicit session state, a revision store capability, prompt construction for a
//! generation backend) plus transport-agnostic handlers that tie them together. It performs no
//! I/O of its own: hosts inject a [`RevisionStore`] and a [`Generator`].

pub mod config;
pub mod error;
pub mod generation;
pub mod service;
pub mod session;
pub mod store;

pub use config::{ComposeConfig, DEFAULT_INITIAL_QUESTION, DiffSettings, ModelSettings};
pub use error::{ComposeError, ConfigError, GenerationError, StoreError};
pub use generation::{CANNED_NUDGE, CannedGenerator, Generator, PromptContext, PromptRequest, prompts};
pub use service::{
    AttributedPreview, ComposeService, DiffQuery, ErrorResponse, GenerateRequest, NudgeRequest,
    NudgeResponse, PreviewResponse, QuestionResponse, SaveRevisionRequest, SaveRevisionResponse,
    Turn,
};
pub use session::SessionState;
pub use store::{MemoryRevisionStore, Revision, RevisionId, RevisionStore};
