//! Error types for the compose layer.

use crate::store::RevisionId;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading a [`crate::ComposeConfig`].
pub enum ConfigError {
    #[error("I/O error: {0}")]
    /// Reading the config file failed.
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    /// The config file is not valid JSON for the config schema.
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    /// A value is out of range.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by a [`crate::RevisionStore`].
pub enum StoreError {
    #[error("no such revision: {0}")]
    /// The revision id is unknown.
    NotFound(RevisionId),

    #[error("revision store unavailable: {0}")]
    /// The backing store cannot serve requests.
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by a [`crate::Generator`].
pub enum GenerationError {
    #[error("API key not configured")]
    /// No generation backend is configured.
    NotConfigured,

    #[error("Server error: {0}")]
    /// The generation backend failed.
    Upstream(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors returned by [`crate::ComposeService`] handlers.
pub enum ComposeError {
    #[error("{0}")]
    /// The request is malformed or premature.
    Validation(String),

    #[error("no such revision: {0}")]
    /// A referenced revision does not exist.
    NoSuchRevision(RevisionId),

    #[error("API key not configured")]
    /// No generation backend is configured.
    NotConfigured,

    #[error("Server error: {0}")]
    /// The generation backend failed.
    Upstream(String),

    #[error("revision store unavailable: {0}")]
    /// The revision store failed.
    Store(String),
}

impl ComposeError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NoSuchRevision(_) => 404,
            Self::NotConfigured => 500,
            Self::Upstream(_) => 502,
            Self::Store(_) => 503,
        }
    }
}

impl From<StoreError> for ComposeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NoSuchRevision(id),
            StoreError::Unavailable(message) => Self::Store(message),
        }
    }
}

impl From<GenerationError> for ComposeError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::NotConfigured => Self::NotConfigured,
            GenerationError::Upstream(message) => Self::Upstream(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ComposeError::Validation("x".into()).status_code(), 400);
        assert_eq!(
            ComposeError::from(StoreError::NotFound(RevisionId::from("rev-9"))).status_code(),
            404
        );
        assert_eq!(
            ComposeError::from(GenerationError::NotConfigured).status_code(),
            500
        );
        assert_eq!(
            ComposeError::from(GenerationError::Upstream("timeout".into())).status_code(),
            502
        );
        assert_eq!(
            ComposeError::from(StoreError::Unavailable("down".into())).status_code(),
            503
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ComposeError::Upstream("boom".into()).to_string(),
            "Server error: boom"
        );
        assert_eq!(
            ComposeError::NoSuchRevision(RevisionId::from("rev-3")).to_string(),
            "no such revision: rev-3"
        );
    }
}
