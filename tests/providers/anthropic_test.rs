//! Anthropic provider wire format tests.

use serde_json::json;
use advisor_synth::providers::anthropic::{build_request, parse_response};
use advisor_synth::providers::{CompletionRequest, ProviderError, StopReason};

fn brief_request() -> CompletionRequest {
    CompletionRequest::single_turn(
        "You are a wealth management assistant.",
        "45-year-old entrepreneur planning a business exit",
        2000,
    )
}

#[test]
fn build_request_sets_model_and_system() {
    let req = build_request("claude-haiku-4-5-20251001", &brief_request());
    assert_eq!(req.model, "claude-haiku-4-5-20251001");
    assert_eq!(
        req.system,
        Some("You are a wealth management assistant.".to_owned())
    );
    assert_eq!(req.max_tokens, 2000);
}

#[test]
fn build_request_sends_instruction_as_single_user_message() {
    let req = build_request("model", &brief_request());
    assert_eq!(req.messages.len(), 1);
    assert_eq!(req.messages[0].role, "user");
    assert_eq!(
        req.messages[0].content,
        "45-year-old entrepreneur planning a business exit"
    );
}

#[test]
fn build_request_default_max_tokens() {
    let mut request = brief_request();
    request.max_tokens = None;
    let req = build_request("model", &request);
    assert_eq!(req.max_tokens, 2000);
}

#[test]
fn build_request_omits_empty_stop_sequences() {
    let req = build_request("model", &brief_request());
    let value = serde_json::to_value(&req).expect("should serialize");
    assert!(value.get("stop_sequences").is_none());
}

#[test]
fn parse_response_joins_text_blocks() {
    let body = json!({
        "content": [
            {"type": "text", "text": "Starting a new chapter "},
            {"type": "text", "text": "takes courage."}
        ],
        "model": "claude-haiku-4-5-20251001",
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 5}
    });
    let resp = parse_response(&body.to_string()).expect("should parse");
    assert_eq!(resp.text, "Starting a new chapter takes courage.");
    assert_eq!(resp.stop_reason, StopReason::EndTurn);
    assert_eq!(resp.usage.input_tokens, 10);
    assert_eq!(resp.usage.output_tokens, 5);
}

#[test]
fn parse_response_ignores_unknown_blocks() {
    let body = json!({
        "content": [
            {"type": "thinking", "thinking": "..."},
            {"type": "text", "text": "Together, we thrive."}
        ],
        "model": "m",
        "stop_reason": "max_tokens",
        "usage": {"input_tokens": 1, "output_tokens": 1}
    });
    let resp = parse_response(&body.to_string()).expect("should parse");
    assert_eq!(resp.text, "Together, we thrive.");
    assert_eq!(resp.stop_reason, StopReason::MaxTokens);
}

#[test]
fn parse_response_rejects_malformed_body() {
    let result = parse_response("not json");
    assert!(matches!(result, Err(ProviderError::Parse(_))));
}
