//! Section outlines and preview placeholders.
//!
//! A preview marks every section that has no content yet with a placeholder of the form
//! `[<Section> - Not yet written]`.

use crate::kind::DocumentKind;
use regex::Regex;
use std::sync::LazyLock;

const ESSAY: &[&str] = &[
    "Introduction",
    "Body Paragraph 1",
    "Body Paragraph 2",
    "Conclusion",
];
const STORY: &[&str] = &[
    "Opening Scene",
    "Character Development",
    "Rising Action",
    "Climax",
];
const EMAIL: &[&str] = &["Greeting", "Purpose", "Details", "Closing"];
const GENERAL: &[&str] = &["Main"];

/// Placeholder suffix used inside the brackets.
pub const PLACEHOLDER_SUFFIX: &str = " - Not yet written";

/// Ordered section names for a document kind.
pub fn outline(kind: DocumentKind) -> &'static [&'static str] {
    match kind {
        DocumentKind::Essay => ESSAY,
        DocumentKind::Story => STORY,
        DocumentKind::Email => EMAIL,
        DocumentKind::General => GENERAL,
    }
}

/// The placeholder text for a section that is not written yet.
///
/// ```rust
/// assert_eq!(
///     revision_core_doc::placeholder("Conclusion"),
///     "[Conclusion - Not yet written]"
/// );
/// ```
pub fn placeholder(section: &str) -> String {
    format!("[{section}{PLACEHOLDER_SUFFIX}]")
}

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]\n]+?) - Not yet written\]").ok());

/// Section names marked as not yet written, in order of appearance (duplicates removed).
pub fn missing_sections(preview: &str) -> Vec<String> {
    let Some(regex) = PLACEHOLDER.as_ref() else {
        return Vec::new();
    };
    let mut sections: Vec<String> = Vec::new();
    for caps in regex.captures_iter(preview) {
        let name = caps[1].trim();
        if !sections.iter().any(|s| s == name) {
            sections.push(name.to_string());
        }
    }
    sections
}

/// The first outline section still to be written.
///
/// A blank preview means nothing is written yet. Otherwise a section is pending while the
/// preview carries its placeholder. Returns `None` once every section has content.
pub fn next_section(kind: DocumentKind, preview: &str) -> Option<&'static str> {
    let sections = outline(kind);
    if preview.trim().is_empty() {
        return sections.first().copied();
    }
    let missing = missing_sections(preview);
    sections
        .iter()
        .copied()
        .find(|section| missing.iter().any(|m| m.eq_ignore_ascii_case(section)))
}

/// A blank preview for `kind`: every section heading followed by its placeholder.
pub fn skeleton(kind: DocumentKind) -> String {
    outline(kind)
        .iter()
        .map(|section| format!("{section}:\n{}", placeholder(section)))
        .collect::<Vec<_>>()
        .join("\n\n")
}
