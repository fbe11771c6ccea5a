//! Provenance spans.
//!
//! Turns an edit script into an ordered list of [`DiffSpan`]s over the **next** snapshot, each
//! tagged with the [`Origin`] of its text:
//!
//! - [`EditKind::Insert`] → [`Origin::Ai`] (text that did not exist before)
//! - [`EditKind::Equal`] → [`Origin::User`] (text carried over unchanged)
//! - [`EditKind::Delete`] → no span (deleted text has no position in `next`)
//!
//! Spans are half-open character ranges. They start at 0, are contiguous and non-overlapping,
//! and the last one ends at the character length of `next`.

use crate::diff::{DiffOptions, diff_with};
use crate::ops::{EditKind, EditOp};
use serde::{Deserialize, Serialize};

/// The attributed author of a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Text the user typed (or that was present before the revision).
    User,
    /// Text the assistant inserted.
    Ai,
}

impl Origin {
    /// Origin of the text covered by an edit of the given kind, if it occupies `next` at all.
    pub fn for_edit(kind: EditKind) -> Option<Self> {
        match kind {
            EditKind::Insert => Some(Self::Ai),
            EditKind::Equal => Some(Self::User),
            EditKind::Delete => None,
        }
    }

    /// Wire label (`"user"` / `"ai"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous slice of the next snapshot tagged with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffSpan {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
    /// Who produced the text in `start..end`.
    pub origin: Origin,
}

impl DiffSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize, origin: Origin) -> Self {
        Self { start, end, origin }
    }

    /// Returns the length of the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Walk an edit script and emit one span per `Insert`/`Equal` operation.
pub fn materialize(ops: &[EditOp]) -> Vec<DiffSpan> {
    let mut spans = Vec::with_capacity(ops.len());
    let mut cursor = 0;
    for op in ops {
        let Some(origin) = Origin::for_edit(op.kind) else {
            continue;
        };
        let len = op.char_len();
        if len == 0 {
            continue;
        }
        spans.push(DiffSpan::new(cursor, cursor + len, origin));
        cursor += len;
    }
    spans
}

/// Diff two snapshots and attribute every character of `next`.
///
/// # Example
///
/// ```rust
/// use revision_core::{DiffSpan, Origin, build_diff_spans};
///
/// let spans = build_diff_spans("abc", "abXc");
/// assert_eq!(
///     spans,
///     vec![
///         DiffSpan::new(0, 2, Origin::User),
///         DiffSpan::new(2, 3, Origin::Ai),
///         DiffSpan::new(3, 4, Origin::User),
///     ]
/// );
/// ```
pub fn build_diff_spans(previous: &str, next: &str) -> Vec<DiffSpan> {
    build_diff_spans_with(previous, next, DiffOptions::default())
}

/// [`build_diff_spans`] with explicit diff options.
pub fn build_diff_spans_with(previous: &str, next: &str, options: DiffOptions) -> Vec<DiffSpan> {
    materialize(&diff_with(previous, next, options))
}

/// [`build_diff_spans`] for snapshots that may be absent; a missing snapshot is empty text.
pub fn build_diff_spans_opt(previous: Option<&str>, next: Option<&str>) -> Vec<DiffSpan> {
    build_diff_spans(previous.unwrap_or_default(), next.unwrap_or_default())
}

/// Span list validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanError {
    /// The first span does not start at offset 0.
    DoesNotStartAtZero {
        /// Start of the first span.
        start: usize,
    },
    /// A span does not start where the previous one ended (gap or overlap).
    NotContiguous {
        /// Index of the offending span.
        index: usize,
        /// Expected start offset.
        expected: usize,
        /// Actual start offset.
        found: usize,
    },
    /// A span is empty or reversed.
    EmptySpan {
        /// Index of the offending span.
        index: usize,
    },
    /// The spans do not end at the length of the text.
    DoesNotCoverText {
        /// End of the last span (0 for an empty list).
        end: usize,
        /// Length of the text.
        len: usize,
    },
}

impl std::fmt::Display for SpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DoesNotStartAtZero { start } => {
                write!(f, "First span starts at {} instead of 0", start)
            }
            Self::NotContiguous {
                index,
                expected,
                found,
            } => write!(
                f,
                "Span {} starts at {} but the previous span ended at {}",
                index, found, expected
            ),
            Self::EmptySpan { index } => write!(f, "Span {} is empty", index),
            Self::DoesNotCoverText { end, len } => {
                write!(f, "Spans end at {} but the text has length {}", end, len)
            }
        }
    }
}

impl std::error::Error for SpanError {}

/// Check that `spans` cover the chars of `next` exactly once, in order.
pub fn validate_spans(spans: &[DiffSpan], next: &str) -> Result<(), SpanError> {
    if let Some(first) = spans.first()
        && first.start != 0
    {
        return Err(SpanError::DoesNotStartAtZero { start: first.start });
    }

    let mut expected = 0;
    for (index, span) in spans.iter().enumerate() {
        if span.start != expected {
            return Err(SpanError::NotContiguous {
                index,
                expected,
                found: span.start,
            });
        }
        if span.is_empty() {
            return Err(SpanError::EmptySpan { index });
        }
        expected = span.end;
    }

    let len = next.chars().count();
    if expected != len {
        return Err(SpanError::DoesNotCoverText { end: expected, len });
    }
    Ok(())
}

/// How much of a text each origin produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionSummary {
    /// Units attributed to the user.
    pub user_chars: usize,
    /// Units attributed to the assistant.
    pub ai_chars: usize,
}

impl AttributionSummary {
    /// Summarize a span list.
    pub fn from_spans(spans: &[DiffSpan]) -> Self {
        spans.iter().fold(Self::default(), |mut summary, span| {
            match span.origin {
                Origin::User => summary.user_chars += span.len(),
                Origin::Ai => summary.ai_chars += span.len(),
            }
            summary
        })
    }

    /// Total attributed length.
    pub fn total(&self) -> usize {
        self.user_chars + self.ai_chars
    }

    /// Fraction of the text produced by the assistant, in `0.0..=1.0` (0 for empty text).
    pub fn ai_ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.ai_chars as f64 / self.total() as f64
        }
    }
}
