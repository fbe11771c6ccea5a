#![warn(missing_docs)]
//! `revision-core-doc` - document-level helpers for `revision-core`.
//!
//! This crate stays independent of the diff engine. It provides the small, data-driven pieces a
//! writing assistant needs around attribution: what kind of document the user is writing, which
//! sections that kind of document has, which of them are still placeholders in a preview, and how
//! many words a response contains.

pub mod kind;
pub mod outline;

pub use kind::{DocumentKind, KeywordClassifier, KeywordRule, classify};
pub use outline::{
    PLACEHOLDER_SUFFIX, missing_sections, next_section, outline, placeholder, skeleton,
};

use unicode_segmentation::UnicodeSegmentation;

/// Count words using Unicode word boundaries (UAX #29).
///
/// Punctuation and whitespace are not words; CJK ideographs count one word each.
///
/// ```rust
/// assert_eq!(revision_core_doc::word_count("Hello, wonderful world!"), 3);
/// assert_eq!(revision_core_doc::word_count("   "), 0);
/// ```
pub fn word_count(text: &str) -> usize {
    text.unicode_words().count()
}
