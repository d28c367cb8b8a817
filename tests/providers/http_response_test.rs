//! HTTP-level provider tests against a one-shot local server.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use advisor_synth::credentials::{AnthropicAuth, OpenAiAuth};
use advisor_synth::providers::anthropic::AnthropicProvider;
use advisor_synth::providers::openai::OpenAiProvider;
use advisor_synth::providers::{
    check_http_response, parse_retry_after, LlmProvider, ProviderError,
};

/// Serve a single HTTP response and hand back the raw request it answered.
pub(crate) async fn serve_once(
    status_line: &str,
    extra_headers: &str,
    body: &str,
) -> (String, oneshot::Receiver<String>) {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };

    let (tx, rx) = oneshot::channel();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n{extra_headers}Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let request = read_request(&mut socket).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            let _ = tx.send(request);
        }
    });

    (format!("http://{addr}/"), rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).into_owned();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let lower = line.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .and_then(|v| v.trim().parse::<usize>().ok())
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn checked(status_line: &str, extra_headers: &str, body: &str) -> ProviderError {
    let (url, _request) = serve_once(status_line, extra_headers, body).await;
    let response = match reqwest::get(url).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };
    match check_http_response(response).await {
        Ok(_) => panic!("response should fail on non-success status"),
        Err(err) => err,
    }
}

#[tokio::test]
async fn check_http_response_redacts_api_keys() {
    let raw_key = "sk-ant-REDACTED";
    let err = checked(
        "401 Unauthorized",
        "",
        &format!("invalid x-api-key {raw_key}"),
    )
    .await;

    match err {
        ProviderError::HttpStatus { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(!body.contains(raw_key));
            assert!(body.contains("[REDACTED]"));
        }
        other => panic!("expected http status error, got: {other}"),
    }
}

#[tokio::test]
async fn check_http_response_truncates_long_error_body() {
    let err = checked("500 Internal Server Error", "", &"x".repeat(400)).await;
    match err {
        ProviderError::HttpStatus { body, .. } => {
            assert!(body.ends_with("...[truncated]"));
        }
        other => panic!("expected http status error, got: {other}"),
    }
}

#[tokio::test]
async fn rate_limit_carries_retry_after_and_is_transient() {
    let err = checked("429 Too Many Requests", "Retry-After: 3\r\n", "{}").await;
    assert!(err.is_transient());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
}

#[tokio::test]
async fn oversized_retry_after_is_ignored_not_fatal() {
    let err = checked("429 Too Many Requests", "Retry-After: 1e30\r\n", "{}").await;
    assert!(err.is_transient());
    assert_eq!(err.retry_after(), None);
}

#[test]
fn retry_after_values() {
    assert_eq!(parse_retry_after(" 2.5 "), Some(Duration::from_millis(2_500)));
    assert_eq!(parse_retry_after("1e30"), None);
    assert_eq!(parse_retry_after("inf"), None);
    assert_eq!(parse_retry_after("NaN"), None);
    assert_eq!(parse_retry_after("-4"), None);
    assert_eq!(parse_retry_after("Wed, 21 Oct 2026 07:28:00 GMT"), None);
}

#[tokio::test]
async fn bad_request_is_not_transient() {
    let err = checked("400 Bad Request", "", "{\"error\":\"bad model\"}").await;
    assert!(!err.is_transient());
    assert_eq!(err.retry_after(), None);
}

#[tokio::test]
async fn anthropic_provider_sends_key_and_version_headers() {
    let body = r#"{"content":[{"type":"text","text":"Together, we thrive."}],"model":"claude-haiku-4-5-20251001","stop_reason":"end_turn","usage":{"input_tokens":3,"output_tokens":4}}"#;
    let (url, request_rx) = serve_once("200 OK", "", body).await;

    let provider = AnthropicProvider::new(
        "claude-haiku-4-5-20251001".to_owned(),
        AnthropicAuth::ApiKey("test-key".to_owned()),
    )
    .with_endpoint(url);
    assert_eq!(provider.model_id(), "anthropic/claude-haiku-4-5-20251001");

    let text = provider
        .complete_text("system rules", "45-year-old client", 100)
        .await
        .expect("completion should succeed");
    assert_eq!(text, "Together, we thrive.");

    let request = request_rx.await.expect("server should capture request");
    let lower = request.to_ascii_lowercase();
    assert!(lower.contains("x-api-key: test-key"));
    assert!(lower.contains("anthropic-version: 2023-06-01"));
    assert!(request.contains("\"system\":\"system rules\""));
    assert!(request.contains("45-year-old client"));
}

#[tokio::test]
async fn openai_provider_sends_bearer_and_system_message() {
    let body = r#"{"choices":[{"message":{"content":"Opening up a world of opportunity."},"finish_reason":"stop"}],"model":"gpt-4o-mini"}"#;
    let (url, request_rx) = serve_once("200 OK", "", body).await;

    let provider = OpenAiProvider::new(
        "gpt-4o-mini".to_owned(),
        OpenAiAuth::ApiKey("sk-test".to_owned()),
    )
    .with_endpoint(url);

    let text = provider
        .complete_text("system rules", "brief", 100)
        .await
        .expect("completion should succeed");
    assert_eq!(text, "Opening up a world of opportunity.");

    let request = request_rx.await.expect("server should capture request");
    assert!(request
        .to_ascii_lowercase()
        .contains("authorization: bearer sk-test"));
    assert!(request.contains(r#"{"role":"system","content":"system rules"}"#));
}

#[tokio::test]
async fn blank_completion_is_an_error() {
    let body = r#"{"choices":[{"message":{"content":"   "},"finish_reason":"stop"}],"model":"gpt-4o-mini"}"#;
    let (url, _request) = serve_once("200 OK", "", body).await;
    let provider = OpenAiProvider::new(
        "gpt-4o-mini".to_owned(),
        OpenAiAuth::ApiKey("sk-test".to_owned()),
    )
    .with_endpoint(url);

    let result = provider.complete_text("s", "u", 10).await;
    assert!(matches!(result, Err(ProviderError::EmptyCompletion)));
}
