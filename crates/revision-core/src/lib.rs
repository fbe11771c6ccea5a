#![warn(missing_docs)]
//! Revision Core - Headless Revision Attribution Engine
//!
//! # Overview
//!
//! `revision-core` answers one question about two snapshots of a document: which characters of
//! the newer snapshot were carried over from the older one, and which were newly inserted.
//! It does not store documents or render anything; it returns plain span lists that an upper
//! layer (HTML heat map, terminal, JSON API) can paint.
//!
//! # Core Features
//!
//! - **Myers Diff**: O(ND) middle-snake bisection over characters, with a line-mode pre-pass for
//!   large inputs
//! - **Semantic Cleanup**: merges fragmented edits into human-readable chunks aligned to word and
//!   line boundaries
//! - **Span Materialization**: contiguous `{start, end, origin}` spans covering the next snapshot
//! - **Offset Units**: char, UTF-16 and UTF-8 offsets for transport
//! - **Deterministic**: identical inputs always produce identical spans
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Attribution (DiffSpan, Origin, Summary)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Offset Conversion (Char / UTF-16 / UTF-8)  │  ← Transport
//! ├─────────────────────────────────────────────┤
//! │  Cleanup (merge, semantic, lossless)        │  ← Readability
//! ├─────────────────────────────────────────────┤
//! │  Diff (Myers bisection, line mode)          │  ← Edit Script
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use revision_core::{AttributionSummary, Origin, build_diff_spans};
//!
//! let spans = build_diff_spans("The cat sat.", "The cat sat on the mat.");
//!
//! assert_eq!(spans.len(), 3);
//! assert_eq!(spans[1].origin, Origin::Ai);
//! assert_eq!((spans[1].start, spans[1].end), (11, 22));
//!
//! let summary = AttributionSummary::from_spans(&spans);
//! assert_eq!(summary.ai_chars, 11);
//! ```
//!
//! # Module Description
//!
//! - [`diff`] - Myers diff producing edit scripts
//! - [`cleanup`] - merge and semantic cleanup passes
//! - [`ops`] - edit operations and script helpers
//! - [`attribution`] - span materialization, validation and summaries
//! - [`offsets`] - offset unit conversion
//!
//! # Unicode Support
//!
//! - Offsets count Unicode scalar values (`char`), never bytes
//! - Multi-byte and astral-plane characters are never split
//! - [`convert_spans`] re-expresses spans in UTF-16 code units for JavaScript clients

pub mod attribution;
pub mod cleanup;
pub mod diff;
pub mod offsets;
pub mod ops;
mod text;

pub use attribution::{
    AttributionSummary, DiffSpan, Origin, SpanError, build_diff_spans, build_diff_spans_opt,
    build_diff_spans_with, materialize, validate_spans,
};
pub use cleanup::{cleanup_merge, cleanup_semantic, cleanup_semantic_lossless};
pub use diff::{DEFAULT_EDIT_BUDGET, DiffOptions, diff, diff_with};
pub use offsets::{OffsetUnit, char_offset_to, convert_spans};
pub use ops::{EditKind, EditOp, source_text, target_text};
