//! Text generation capability and prompt construction.

use crate::error::GenerationError;
use revision_core_doc::{DocumentKind, outline, placeholder};
use serde::Serialize;

/// Writing context a prompt was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptContext {
    /// Kind of document being written.
    pub document_type: DocumentKind,
    /// Section the user is working on.
    pub current_section: String,
    /// The user's responses so far, oldest first.
    pub responses: Vec<String>,
}

/// A fully built request for a generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// System prompt.
    pub system: String,
    /// User message.
    pub user: String,
    /// Structured context, for backends that do not need the rendered prompt.
    #[serde(skip)]
    pub context: PromptContext,
}

/// A generation backend.
pub trait Generator {
    /// Feedback plus one follow-up question.
    fn question(&self, request: &PromptRequest) -> Result<String, GenerationError>;

    /// A structured preview of the document so far.
    fn preview(&self, request: &PromptRequest) -> Result<String, GenerationError>;

    /// A short Socratic question about a passage.
    fn nudge(&self, request: &PromptRequest) -> Result<String, GenerationError>;
}

impl<T: Generator + ?Sized> Generator for &T {
    fn question(&self, request: &PromptRequest) -> Result<String, GenerationError> {
        (**self).question(request)
    }

    fn preview(&self, request: &PromptRequest) -> Result<String, GenerationError> {
        (**self).preview(request)
    }

    fn nudge(&self, request: &PromptRequest) -> Result<String, GenerationError> {
        (**self).nudge(request)
    }
}

pub mod prompts {
    //! Prompt builders for the three generation calls.

    use super::{PromptContext, PromptRequest};
    use crate::config::ModelSettings;

    const QUESTION_SYSTEM: &str = "You are a supportive writing coach helping a user improve their writing. The user will share a piece of writing they're working on, and you should:

1. Acknowledge their effort - Start by recognizing what they've accomplished so far
2. Provide 1 actionable tip based on their writing, such as:
   - Strengthening word choice or sentence structure
   - Improving flow and transitions
   - Enhancing clarity or conciseness
   - Developing ideas more fully
   - Addressing organization or structure
3. Ask one engaging follow-up question that helps them continue writing or think deeper about their work

Guidelines:
- Be encouraging and constructive, never harsh or overly critical
- Focus on specific elements you notice rather than generic advice
- Make your tips concrete and actionable
- Ask questions that spark creativity or help them overcome potential blocks
- Keep your response concise (3 sentences max)
- Match your tone to the type of writing (formal for academic, casual for personal, etc.)";

    const PREVIEW_RULES: &str = "Based on the user's responses so far, create a document preview that:

1. Clearly separates sections with headings (e.g., Introduction, Body Paragraph 1, Body Paragraph 2, Conclusion).
2. Formats the document to display each section on its own line, with blank lines between sections.
3. Improves the user's content while maintaining their core ideas.
4. Indicates missing sections with placeholders like [Section Name - Not yet written].

Make sure to only add 1-2 sentences per iteration. We want the user to do most of the work in writing the document, we just want to help guide the user along by turning their thoughts into structured sentences.

Do not add AI commentary or meta-descriptions.";

    const NUDGE_SYSTEM: &str = "You are a Socratic writing tutor. Ask exactly one short, open question that makes the writer examine their reasoning in the given passage. Do not rewrite the passage and do not give advice.";

    /// Feedback-and-question prompt.
    pub fn question(settings: &ModelSettings, context: PromptContext) -> PromptRequest {
        let user = format!(
            "Context:\nDocument Type: {}\nCurrent Section: {}\nPrevious Writing:\n{}\n\nPlease provide feedback and ask a question to help them continue.",
            context.document_type,
            context.current_section,
            context.responses.join("\n"),
        );
        request(settings, QUESTION_SYSTEM.to_string(), user, context)
    }

    /// Document preview prompt.
    pub fn preview(settings: &ModelSettings, context: PromptContext) -> PromptRequest {
        let system = format!(
            "You are helping to structure and improve a {}. {}",
            context.document_type, PREVIEW_RULES
        );
        let user = format!(
            "Current Section: {}\nUser's Writing So Far:\n{}\n\nPlease generate a structured preview of the document, improving existing content while marking missing sections.",
            context.current_section,
            context.responses.join("\n"),
        );
        request(settings, system, user, context)
    }

    /// Socratic nudge prompt for one passage.
    pub fn nudge(settings: &ModelSettings, section: &str, excerpt: &str) -> PromptRequest {
        let user = format!("Section: {section}\nPassage:\n{excerpt}");
        let context = PromptContext {
            current_section: section.to_string(),
            responses: vec![excerpt.to_string()],
            ..PromptContext::default()
        };
        request(settings, NUDGE_SYSTEM.to_string(), user, context)
    }

    fn request(
        settings: &ModelSettings,
        system: String,
        user: String,
        context: PromptContext,
    ) -> PromptRequest {
        PromptRequest {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            system,
            user,
            context,
        }
    }
}

/// Fixed nudge returned by [`CannedGenerator`].
pub const CANNED_NUDGE: &str = "What is your main reason for choosing this approach?";

/// Offline [`Generator`] with fixed, deterministic output.
///
/// Previews lay the user's responses under the current section of the document's outline and
/// mark every other section with its placeholder.
#[derive(Debug, Clone, Default)]
pub struct CannedGenerator;

impl CannedGenerator {
    /// Create the generator.
    pub fn new() -> Self {
        Self
    }
}

impl Generator for CannedGenerator {
    fn question(&self, request: &PromptRequest) -> Result<String, GenerationError> {
        let context = &request.context;
        let section = section_label(context);
        Ok(format!(
            "Thanks, that gives the {} a clear start. What is one concrete detail you could add to the {} section?",
            context.document_type,
            section.to_lowercase()
        ))
    }

    fn preview(&self, request: &PromptRequest) -> Result<String, GenerationError> {
        let context = &request.context;
        let current = section_label(context);
        let body = context
            .responses
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(outline(context.document_type)
            .iter()
            .map(|section| {
                if *section == current && !body.is_empty() {
                    format!("{section}:\n{body}")
                } else {
                    format!("{section}:\n{}", placeholder(section))
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    fn nudge(&self, _request: &PromptRequest) -> Result<String, GenerationError> {
        Ok(CANNED_NUDGE.to_string())
    }
}

/// The outline section matching the context's current section, or the first one.
fn section_label(context: &PromptContext) -> &'static str {
    let sections = outline(context.document_type);
    sections
        .iter()
        .copied()
        .find(|s| s.eq_ignore_ascii_case(context.current_section.trim()))
        .or_else(|| sections.first().copied())
        .unwrap_or("Main")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSettings;

    fn context(kind: DocumentKind, section: &str, responses: &[&str]) -> PromptContext {
        PromptContext {
            document_type: kind,
            current_section: section.to_string(),
            responses: responses.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_question_prompt_carries_context() {
        let request = prompts::question(
            &ModelSettings::new("m"),
            context(DocumentKind::Essay, "Introduction", &["first", "second"]),
        );
        assert_eq!(request.model, "m");
        assert_eq!(request.max_tokens, 1024);
        assert!(request.user.contains("Document Type: essay"));
        assert!(request.user.contains("Current Section: Introduction"));
        assert!(request.user.contains("first\nsecond"));
    }

    #[test]
    fn test_preview_prompt_names_document_type() {
        let request = prompts::preview(
            &ModelSettings::new("m"),
            context(DocumentKind::Story, "main", &["once"]),
        );
        assert!(request.system.starts_with("You are helping to structure and improve a story."));
        assert!(request.user.contains("User's Writing So Far:\nonce"));
    }

    #[test]
    fn test_prompt_json_omits_context() {
        let request = prompts::nudge(&ModelSettings::new("m"), "Purpose", "Because.");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["maxTokens"], 1024);
        assert!(value.get("context").is_none());
    }

    #[test]
    fn test_canned_preview_fills_current_section() {
        let request = prompts::preview(
            &ModelSettings::new("m"),
            context(DocumentKind::Essay, "introduction", &["Cities are loud.", " They never sleep. "]),
        );
        let preview = CannedGenerator.preview(&request).unwrap();
        assert_eq!(
            preview,
            "Introduction:\nCities are loud. They never sleep.\n\n\
             Body Paragraph 1:\n[Body Paragraph 1 - Not yet written]\n\n\
             Body Paragraph 2:\n[Body Paragraph 2 - Not yet written]\n\n\
             Conclusion:\n[Conclusion - Not yet written]"
        );
    }

    #[test]
    fn test_canned_nudge() {
        let request = prompts::nudge(&ModelSettings::new("m"), "Main", "text");
        assert_eq!(CannedGenerator.nudge(&request).unwrap(), CANNED_NUDGE);
    }
}
