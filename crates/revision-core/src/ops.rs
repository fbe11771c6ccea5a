//! Edit scripts.
//!
//! An edit script is an ordered list of [`EditOp`]s describing how to turn a `previous` snapshot
//! into a `next` snapshot:
//!
//! - concatenating the [`EditKind::Equal`] and [`EditKind::Insert`] texts yields `next`
//! - concatenating the [`EditKind::Equal`] and [`EditKind::Delete`] texts yields `previous`

use serde::{Deserialize, Serialize};

/// The kind of an edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// Text present only in `next`.
    Insert,
    /// Text present only in `previous`.
    Delete,
    /// Text present, unchanged, in both snapshots.
    Equal,
}

/// A single edit operation paired with the text it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOp {
    /// What happened to `text`.
    pub kind: EditKind,
    /// The affected text.
    pub text: String,
}

impl EditOp {
    /// Create an operation of the given kind.
    pub fn new(kind: EditKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Shorthand for an [`EditKind::Insert`] operation.
    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(EditKind::Insert, text)
    }

    /// Shorthand for an [`EditKind::Delete`] operation.
    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(EditKind::Delete, text)
    }

    /// Shorthand for an [`EditKind::Equal`] operation.
    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(EditKind::Equal, text)
    }

    /// Length of `text` in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Rebuild the `previous` snapshot from an edit script.
pub fn source_text(ops: &[EditOp]) -> String {
    ops.iter()
        .filter(|op| op.kind != EditKind::Insert)
        .map(|op| op.text.as_str())
        .collect()
}

/// Rebuild the `next` snapshot from an edit script.
pub fn target_text(ops: &[EditOp]) -> String {
    ops.iter()
        .filter(|op| op.kind != EditKind::Delete)
        .map(|op| op.text.as_str())
        .collect()
}

/// Working representation used by the diff and cleanup passes: a kind plus a token run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chunk<T> {
    pub(crate) kind: EditKind,
    pub(crate) items: Vec<T>,
}

impl<T> Chunk<T> {
    pub(crate) fn new(kind: EditKind, items: Vec<T>) -> Self {
        Self { kind, items }
    }
}

impl<T: Clone> Chunk<T> {
    pub(crate) fn from_slice(kind: EditKind, items: &[T]) -> Self {
        Self::new(kind, items.to_vec())
    }
}

pub(crate) fn chunks_from_ops(ops: &[EditOp]) -> Vec<Chunk<char>> {
    ops.iter()
        .map(|op| Chunk::new(op.kind, op.text.chars().collect()))
        .collect()
}

pub(crate) fn ops_from_chunks(chunks: Vec<Chunk<char>>) -> Vec<EditOp> {
    chunks
        .into_iter()
        .map(|chunk| EditOp::new(chunk.kind, chunk.items.into_iter().collect::<String>()))
        .collect()
}
