use pretty_assertions::assert_eq;
use revision_core::{Origin, validate_spans};
use revision_core_compose::{
    CannedGenerator, ComposeConfig, ComposeError, ComposeService, GenerationError, Generator,
    MemoryRevisionStore, PromptRequest, SessionState,
};
use revision_core_doc::DocumentKind;

const OPENING: &str = "I want to write an essay about why big cities can feel so lonely.";

fn service() -> ComposeService<MemoryRevisionStore, CannedGenerator> {
    ComposeService::new(
        MemoryRevisionStore::new(),
        CannedGenerator::new(),
        ComposeConfig::default(),
    )
}

#[test]
fn test_short_first_response_is_rejected_without_state_change() {
    let service = service();
    let state = service.new_session();
    let err = service.submit_turn(&state, "Cities are lonely.").unwrap_err();
    assert_eq!(
        err,
        ComposeError::Validation(
            "Your response must be at least 10 words. Please try again.".to_string()
        )
    );
    assert!(state.responses.is_empty());
}

#[test]
fn test_first_turn_classifies_document() {
    let service = service();
    let turn = service
        .submit_turn(&service.new_session(), &format!("  {OPENING}\n"))
        .unwrap();

    assert_eq!(turn.state.responses, vec![OPENING.to_string()]);
    assert_eq!(turn.state.document_kind, DocumentKind::Essay);
    assert_eq!(turn.state.current_section, "Introduction");
    assert_eq!(turn.state.current_question, turn.question);
    assert!(turn.preview.is_none());
    assert_eq!(turn.state.responses_until_preview(service.config()), 4);
}

#[test]
fn test_fifth_turn_produces_attributed_preview() {
    let service = service();
    let mut state = service.new_session();
    let responses = [
        OPENING,
        "Neighbours rarely talk.",
        "Commutes are long and tiring.",
        "Apps replace small talk.",
        "Yet parks and libraries still bring people together.",
    ];

    for (i, response) in responses.iter().enumerate() {
        let turn = service.submit_turn(&state, response).unwrap();
        if i < 4 {
            assert!(turn.preview.is_none(), "no preview expected on turn {}", i + 1);
        } else {
            let preview = turn.preview.clone().unwrap();
            assert_eq!(preview.text, turn.state.document_preview);
            assert_eq!(validate_spans(&preview.spans, &preview.text), Ok(()));
            assert!(preview.summary.user_chars > 0);
            assert!(preview.summary.ai_chars > 0);
            assert!(
                preview
                    .spans
                    .iter()
                    .any(|span| span.origin == Origin::User && span.len() > 20)
            );
            assert_eq!(turn.state.current_section, "Body Paragraph 1");
        }
        state = turn.state;
    }
    assert_eq!(state.responses.len(), 5);
    assert_eq!(state.last_error, None);
}

struct FlakyPreview;

impl Generator for FlakyPreview {
    fn question(&self, _: &PromptRequest) -> Result<String, GenerationError> {
        Ok("What happens next?".to_string())
    }

    fn preview(&self, _: &PromptRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Upstream("rate limited".to_string()))
    }

    fn nudge(&self, _: &PromptRequest) -> Result<String, GenerationError> {
        Ok(String::new())
    }
}

#[test]
fn test_preview_failure_is_recorded_not_raised() {
    let config = ComposeConfig {
        preview_after_responses: 1,
        ..ComposeConfig::default()
    };
    let service = ComposeService::new(MemoryRevisionStore::new(), FlakyPreview, config);
    let turn = service.submit_turn(&service.new_session(), OPENING).unwrap();

    assert_eq!(turn.question, "What happens next?");
    assert!(turn.preview.is_none());
    assert_eq!(
        turn.state.last_error.as_deref(),
        Some("Server error: rate limited")
    );
    assert_eq!(turn.state.responses.len(), 1);

    // The next turn retries the preview and records the new failure.
    let next = service.submit_turn(&turn.state, "More thoughts.").unwrap();
    assert_eq!(next.state.responses.len(), 2);
    assert_eq!(
        next.state.last_error.as_deref(),
        Some("Server error: rate limited")
    );
}

struct VerbosePreview;

impl Generator for VerbosePreview {
    fn question(&self, _: &PromptRequest) -> Result<String, GenerationError> {
        Ok("Tell me more.".to_string())
    }

    fn preview(&self, _: &PromptRequest) -> Result<String, GenerationError> {
        Ok("word ".repeat(100))
    }

    fn nudge(&self, _: &PromptRequest) -> Result<String, GenerationError> {
        Ok(String::new())
    }
}

#[test]
fn test_oversized_preview_is_recorded_not_diffed() {
    let config = ComposeConfig {
        preview_after_responses: 1,
        max_document_chars: 100,
        ..ComposeConfig::default()
    };
    let service = ComposeService::new(MemoryRevisionStore::new(), VerbosePreview, config);
    let turn = service.submit_turn(&service.new_session(), OPENING).unwrap();

    assert_eq!(turn.question, "Tell me more.");
    assert!(turn.preview.is_none());
    assert_eq!(turn.state.document_preview, "");
    assert_eq!(
        turn.state.last_error.as_deref(),
        Some("Document has 500 characters; the limit is 100.")
    );
    assert_eq!(turn.state.responses, vec![OPENING.to_string()]);
}

#[test]
fn test_state_survives_json_between_turns() {
    let service = service();
    let turn = service.submit_turn(&service.new_session(), OPENING).unwrap();
    let json = serde_json::to_string(&turn.state).unwrap();
    let restored: SessionState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, turn.state);

    let next = service.submit_turn(&restored, "Short is fine now.").unwrap();
    assert_eq!(next.state.responses.len(), 2);
    assert_eq!(next.state.document_kind, DocumentKind::Essay);
}
