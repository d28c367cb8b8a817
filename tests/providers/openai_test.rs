//! OpenAI provider wire format tests.

use serde_json::json;
use advisor_synth::providers::openai::{build_request, parse_response};
use advisor_synth::providers::{CompletionRequest, ProviderError, StopReason};

#[test]
fn build_request_puts_system_prompt_first() {
    let request = CompletionRequest::single_turn("rules", "brief", 512);
    let req = build_request("gpt-4o-mini", &request);
    assert_eq!(req.model, "gpt-4o-mini");
    assert_eq!(req.messages.len(), 2);
    assert_eq!(req.messages[0].role, "system");
    assert_eq!(req.messages[0].content, "rules");
    assert_eq!(req.messages[1].role, "user");
    assert_eq!(req.messages[1].content, "brief");
    assert_eq!(req.max_tokens, Some(512));
}

#[test]
fn build_request_without_system_prompt() {
    let mut request = CompletionRequest::single_turn("rules", "brief", 512);
    request.system = None;
    let req = build_request("m", &request);
    assert_eq!(req.messages.len(), 1);
    assert_eq!(req.messages[0].role, "user");
}

#[test]
fn parse_response_reads_first_choice() {
    let body = json!({
        "choices": [{"message": {"content": "Draft"}, "finish_reason": "length"}],
        "model": "gpt-4o-mini",
        "usage": {"prompt_tokens": 12, "completion_tokens": 34}
    });
    let resp = parse_response(&body.to_string()).expect("should parse");
    assert_eq!(resp.text, "Draft");
    assert_eq!(resp.stop_reason, StopReason::MaxTokens);
    assert_eq!(resp.usage.input_tokens, 12);
    assert_eq!(resp.usage.output_tokens, 34);
}

#[test]
fn parse_response_without_usage_defaults_to_zero() {
    let body = json!({
        "choices": [{"message": {"content": "Draft"}, "finish_reason": "stop"}],
        "model": "gpt-4o-mini"
    });
    let resp = parse_response(&body.to_string()).expect("should parse");
    assert_eq!(resp.usage.input_tokens, 0);
    assert_eq!(resp.stop_reason, StopReason::EndTurn);
}

#[test]
fn parse_response_without_choices_is_parse_error() {
    let body = json!({"choices": [], "model": "gpt-4o-mini"});
    let result = parse_response(&body.to_string());
    match result {
        Err(ProviderError::Parse(msg)) => assert!(msg.contains("choices")),
        other => panic!("expected parse error, got: {other:?}"),
    }
}
