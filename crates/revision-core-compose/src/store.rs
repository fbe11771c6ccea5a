//! Revision persistence.
//!
//! A revision is an immutable snapshot of a document's content together with who produced it.
//! Each new revision of a document records the previous head as its parent, so the diff of a
//! revision against its parent is always available.

use crate::error::StoreError;
use revision_core::Origin;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Opaque revision identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(String);

impl RevisionId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RevisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RevisionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RevisionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// This revision's id.
    pub id: RevisionId,
    /// The document this revision belongs to.
    pub document_id: String,
    /// Full document content.
    pub content: String,
    /// Who produced this revision.
    pub source: Origin,
    /// The document's head revision at the time this one was saved.
    pub parent: Option<RevisionId>,
}

/// Storage capability for revisions.
pub trait RevisionStore {
    /// Persist a new revision and make it the document's head.
    fn save(&self, document_id: &str, content: &str, source: Origin)
    -> Result<RevisionId, StoreError>;

    /// Load a revision by id.
    fn load(&self, id: &RevisionId) -> Result<Revision, StoreError>;

    /// All revisions of a document, oldest first.
    fn history(&self, document_id: &str) -> Result<Vec<Revision>, StoreError>;
}

impl<T: RevisionStore + ?Sized> RevisionStore for &T {
    fn save(
        &self,
        document_id: &str,
        content: &str,
        source: Origin,
    ) -> Result<RevisionId, StoreError> {
        (**self).save(document_id, content, source)
    }

    fn load(&self, id: &RevisionId) -> Result<Revision, StoreError> {
        (**self).load(id)
    }

    fn history(&self, document_id: &str) -> Result<Vec<Revision>, StoreError> {
        (**self).history(document_id)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: u64,
    revisions: HashMap<RevisionId, Revision>,
    documents: HashMap<String, Vec<RevisionId>>,
}

/// In-memory, thread-safe [`RevisionStore`]. Ids are assigned sequentially (`rev-1`, `rev-2`, ...).
#[derive(Debug, Default)]
pub struct MemoryRevisionStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryRevisionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored revisions.
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.revisions.len())
    }

    /// Returns `true` if nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    tracing::error!("Revision store lock poisoned");
    StoreError::Unavailable("revision store lock poisoned".to_string())
}

impl RevisionStore for MemoryRevisionStore {
    fn save(
        &self,
        document_id: &str,
        content: &str,
        source: Origin,
    ) -> Result<RevisionId, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.next_id += 1;
        let id = RevisionId::new(format!("rev-{}", inner.next_id));

        let MemoryInner {
            revisions,
            documents,
            ..
        } = &mut *inner;
        let history = documents.entry(document_id.to_string()).or_default();
        let parent = history.last().cloned();
        history.push(id.clone());
        revisions.insert(
            id.clone(),
            Revision {
                id: id.clone(),
                document_id: document_id.to_string(),
                content: content.to_string(),
                source,
                parent,
            },
        );

        tracing::debug!("Saved revision {} for document {}", id, document_id);
        Ok(id)
    }

    fn load(&self, id: &RevisionId) -> Result<Revision, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        inner
            .revisions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn history(&self, document_id: &str) -> Result<Vec<Revision>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .documents
            .get(document_id)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.revisions.get(id).cloned())
            .collect())
    }
}
