//! Server-Sent Events (SSE) parser for streaming chat completions
//!
//! OpenAI streams completions as `data:` lines, each carrying a chunk
//! object with a content delta, terminated by a literal `data: [DONE]`.

use futures_util::StreamExt;
use reqwest::Response;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::error::OpenAiError;
use super::models::StreamEvent;

/// Process an SSE stream from the chat completions API
///
/// Reads the response body as a stream of SSE events and sends parsed
/// events through the provided channel. Respects the cancellation token
/// for user interruption.
pub async fn process_stream(
    response: Response,
    tx: mpsc::Sender<StreamEvent>,
    cancel_token: CancellationToken,
) -> Result<(), OpenAiError> {
    let mut stream = response.bytes_stream();
    let mut buffer = String::new();

    loop {
        tokio::select! {
            // Check for cancellation
            _ = cancel_token.cancelled() => {
                return Err(OpenAiError::Cancelled);
            }

            // Process next chunk from stream
            chunk = stream.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));

                        // Process complete lines
                        while let Some(newline_pos) = buffer.find('\n') {
                            let line = buffer[..newline_pos].trim_end().to_string();
                            buffer = buffer[newline_pos + 1..].to_string();

                            if let Some(data) = line.strip_prefix("data: ") {
                                if let Some(event) = parse_event(data) {
                                    let done = matches!(event, StreamEvent::Done);
                                    // Send event, exit if receiver dropped
                                    if tx.send(event).await.is_err() || done {
                                        return Ok(());
                                    }
                                }
                            }
                            // Ignore empty lines and comments (lines starting with :)
                        }
                    }
                    Some(Err(e)) => {
                        return Err(OpenAiError::RequestError(e));
                    }
                    None => {
                        // Stream ended
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Parse a single SSE data payload
fn parse_event(data: &str) -> Option<StreamEvent> {
    if data == "[DONE]" {
        return Some(StreamEvent::Done);
    }

    let parsed: serde_json::Value = serde_json::from_str(data).ok()?;

    if let Some(error) = parsed.get("error") {
        let message = error["message"].as_str().unwrap_or("Unknown error").to_string();
        return Some(StreamEvent::Error { message });
    }

    let delta = &parsed["choices"][0]["delta"];
    match delta["content"].as_str() {
        Some(text) if !text.is_empty() => Some(StreamEvent::ContentDelta { text: text.to_string() }),
        // Role-only and empty deltas carry no text
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_content_delta() {
        let data = r#"{"id":"chatcmpl-1","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#;
        let event = parse_event(data);
        assert!(matches!(
            event,
            Some(StreamEvent::ContentDelta { text }) if text == "Hello"
        ));
    }

    #[test]
    fn parse_role_only_delta_is_skipped() {
        let data = r#"{"id":"chatcmpl-1","choices":[{"index":0,"delta":{"role":"assistant"},"finish_reason":null}]}"#;
        assert!(parse_event(data).is_none());
    }

    #[test]
    fn parse_done_marker() {
        let event = parse_event("[DONE]");
        assert!(matches!(event, Some(StreamEvent::Done)));
    }

    #[test]
    fn parse_error() {
        let data = r#"{"error":{"type":"invalid_request_error","message":"Bad request"}}"#;
        let event = parse_event(data);
        assert!(matches!(
            event,
            Some(StreamEvent::Error { message }) if message == "Bad request"
        ));
    }
}
