//! Offset unit conversion.
//!
//! Spans are computed in Unicode scalar values (chars). Browser clients index strings in UTF-16
//! code units and byte-oriented consumers want UTF-8 offsets, so spans can be re-expressed in
//! either unit against the text they describe.

use crate::attribution::DiffSpan;
use serde::{Deserialize, Serialize};

/// The unit span offsets are measured in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    /// Unicode scalar values.
    #[default]
    Char,
    /// UTF-16 code units (JavaScript string indices).
    Utf16,
    /// UTF-8 bytes.
    Utf8,
}

impl OffsetUnit {
    /// Width of `ch` in this unit.
    pub fn width(self, ch: char) -> usize {
        match self {
            Self::Char => 1,
            Self::Utf16 => ch.len_utf16(),
            Self::Utf8 => ch.len_utf8(),
        }
    }

    /// Length of `text` in this unit.
    pub fn len(self, text: &str) -> usize {
        match self {
            Self::Char => text.chars().count(),
            Self::Utf16 => text.encode_utf16().count(),
            Self::Utf8 => text.len(),
        }
    }
}

/// Convert a char offset in `text` into `unit`.
///
/// Offsets past the end clamp to the length of `text`.
pub fn char_offset_to(text: &str, char_offset: usize, unit: OffsetUnit) -> usize {
    text.chars()
        .take(char_offset)
        .map(|ch| unit.width(ch))
        .sum()
}

/// Re-express char-based spans over `text` in `unit`.
///
/// The spans must be sorted, which [`crate::build_diff_spans`] guarantees; the text is walked
/// once regardless of the number of spans.
pub fn convert_spans(text: &str, spans: &[DiffSpan], unit: OffsetUnit) -> Vec<DiffSpan> {
    if unit == OffsetUnit::Char {
        return spans.to_vec();
    }

    let mut chars = text.chars();
    let mut char_pos = 0;
    let mut unit_pos = 0;
    let mut advance_to = |target: usize| {
        while char_pos < target {
            let Some(ch) = chars.next() else {
                break;
            };
            unit_pos += unit.width(ch);
            char_pos += 1;
        }
        unit_pos
    };

    spans
        .iter()
        .map(|span| {
            let start = advance_to(span.start);
            let end = advance_to(span.end);
            DiffSpan::new(start, end, span.origin)
        })
        .collect()
}
