//! `LlmProvider` contract tests with an in-process provider.

use std::sync::Mutex;

use async_trait::async_trait;
use advisor_synth::providers::{
    CompletionRequest, CompletionResponse, LlmProvider, ProviderError, Role, StopReason,
    UsageStats,
};

struct RecordingProvider {
    reply: String,
    seen: Mutex<Vec<CompletionRequest>>,
}

#[async_trait]
impl LlmProvider for RecordingProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request);
        }
        Ok(CompletionResponse {
            text: self.reply.clone(),
            stop_reason: StopReason::EndTurn,
            usage: UsageStats::default(),
            model: "fake".to_owned(),
        })
    }

    fn model_id(&self) -> &str {
        "fake/model"
    }
}

#[tokio::test]
async fn complete_text_builds_single_turn_request() {
    let provider = RecordingProvider {
        reply: "draft".to_owned(),
        seen: Mutex::new(Vec::new()),
    };
    let text = provider
        .complete_text("system", "instruction", 321)
        .await
        .expect("should complete");
    assert_eq!(text, "draft");

    let seen = provider.seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    let request = &seen[0];
    assert_eq!(request.system.as_deref(), Some("system"));
    assert_eq!(request.max_tokens, Some(321));
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, Role::User);
    assert_eq!(request.messages[0].content, "instruction");
}

#[tokio::test]
async fn complete_text_rejects_whitespace_reply() {
    let provider = RecordingProvider {
        reply: "\n  \n".to_owned(),
        seen: Mutex::new(Vec::new()),
    };
    let result = provider.complete_text("s", "u", 10).await;
    assert!(matches!(result, Err(ProviderError::EmptyCompletion)));
}

#[test]
fn server_errors_are_transient_and_client_errors_are_not() {
    let status = |status: u16| ProviderError::HttpStatus {
        status,
        body: String::new(),
        retry_after: None,
    };
    for code in [408, 409, 429, 500, 502, 503, 529] {
        assert!(status(code).is_transient(), "{code} should be transient");
    }
    for code in [400, 401, 403, 404, 422] {
        assert!(!status(code).is_transient(), "{code} should not be transient");
    }
    assert!(!ProviderError::EmptyCompletion.is_transient());
    assert!(!ProviderError::Parse("bad".to_owned()).is_transient());
}
