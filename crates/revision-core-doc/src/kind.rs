//! Document kinds and keyword classification.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The kind of document a user is writing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// An argumentative or expository essay.
    Essay,
    /// A narrative piece.
    Story,
    /// An email or letter.
    Email,
    /// Anything else.
    #[default]
    #[serde(other)]
    General,
}

impl DocumentKind {
    /// All kinds, in classification priority order (fallback last).
    pub const ALL: [DocumentKind; 4] = [Self::Essay, Self::Story, Self::Email, Self::General];

    /// Wire label (`"essay"`, `"story"`, `"email"`, `"general"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Essay => "essay",
            Self::Story => "story",
            Self::Email => "email",
            Self::General => "general",
        }
    }

    /// Parse a label case-insensitively. Unknown or empty labels map to [`DocumentKind::General`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyword rule mapping whole-word matches to a document kind.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    regex: Regex,
    kind: DocumentKind,
}

impl KeywordRule {
    /// Build a case-insensitive whole-word rule from a keyword list.
    pub fn new(kind: DocumentKind, keywords: &[&str]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
        let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
        Ok(Self {
            regex: Regex::new(&pattern)?,
            kind,
        })
    }

    /// The kind this rule votes for.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Returns `true` if any keyword occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// An ordered list of keyword rules; the first matching rule wins.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
}

impl KeywordClassifier {
    /// Create a classifier from explicit rules.
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Built-in rules: essay, then story, then email.
    pub fn builtin() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            KeywordRule::new(
                DocumentKind::Essay,
                &["essay", "essays", "thesis", "argument", "argumentative"],
            )?,
            KeywordRule::new(
                DocumentKind::Story,
                &["story", "stories", "novel", "narrative", "fiction", "tale"],
            )?,
            KeywordRule::new(
                DocumentKind::Email,
                &["email", "emails", "e-mail", "letter", "memo"],
            )?,
        ]))
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Classify `text`, falling back to [`DocumentKind::General`] when nothing matches.
    pub fn classify(&self, text: &str) -> DocumentKind {
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map_or(DocumentKind::General, KeywordRule::kind)
    }
}

static BUILTIN: LazyLock<Option<KeywordClassifier>> =
    LazyLock::new(|| KeywordClassifier::builtin().ok());

/// Infer the document kind from free text using the built-in keyword rules.
///
/// Matching is case-insensitive and whole-word. When several kinds match, the priority is
/// essay, story, email. Text mentioning none of them is [`DocumentKind::General`].
///
/// ```rust
/// use revision_core_doc::{DocumentKind, classify};
///
/// assert_eq!(classify("I want to write an Essay about cities"), DocumentKind::Essay);
/// assert_eq!(classify("A short story for my niece"), DocumentKind::Story);
/// assert_eq!(classify("Notes on gardening"), DocumentKind::General);
/// ```
pub fn classify(text: &str) -> DocumentKind {
    BUILTIN
        .as_ref()
        .map_or(DocumentKind::General, |classifier| classifier.classify(text))
}
