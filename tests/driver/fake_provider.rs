//! Scripted in-process provider.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use advisor_synth::providers::{
    CompletionRequest, CompletionResponse, LlmProvider, ProviderError, StopReason, UsageStats,
};

/// Replays scripted outcomes in order, then echoes the user message.
pub struct FakeProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    seen: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn echo() -> Self {
        Self::new(Vec::new())
    }

    /// User messages received, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

pub fn http_error(status: u16) -> ProviderError {
    ProviderError::HttpStatus {
        status,
        body: String::new(),
        retry_after: None,
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let user = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(user.clone());
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let text = match next {
            Some(outcome) => outcome?,
            None => format!("draft for {user}"),
        };
        Ok(CompletionResponse {
            text,
            stop_reason: StopReason::EndTurn,
            usage: UsageStats::default(),
            model: "fake".to_owned(),
        })
    }

    fn model_id(&self) -> &str {
        "fake/model"
    }
}
