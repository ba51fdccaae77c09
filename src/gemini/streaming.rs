// Gemini API streaming client

use crate::error::{AdapterError, Result};
use crate::models::gemini::GenerateContentResponse;
use futures::stream::Stream;
use std::pin::Pin;
use tracing::{debug, warn};

/// Submit a prepared streaming request and parse the SSE response into a
/// chunk stream.
pub async fn stream_generate_content(
    builder: reqwest::RequestBuilder,
) -> Result<Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>> {
    let response = builder.send().await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(AdapterError::Api(format!(
            "HTTP {}: {}",
            status, error_text
        )));
    }

    debug!("Gemini SSE stream opened");

    // Convert response to byte stream and parse SSE events
    let byte_stream = response.bytes_stream();
    let event_stream = parse_sse_stream(byte_stream);

    Ok(Box::pin(event_stream))
}

/// Parse an SSE byte stream into GenerateContentResponse chunks
fn parse_sse_stream<S>(
    byte_stream: S,
) -> impl Stream<Item = Result<GenerateContentResponse>> + Send
where
    S: Stream<Item = reqwest::Result<bytes::Bytes>> + Send + 'static,
{
    use futures::StreamExt;

    async_stream::stream! {
        let mut buffer = String::new();

        futures::pin_mut!(byte_stream);

        while let Some(chunk_result) = byte_stream.next().await {
            match chunk_result {
                Ok(chunk) => {
                    buffer.push_str(&String::from_utf8_lossy(&chunk));

                    // Process complete events (ends with \n\n)
                    while let Some(event_end) = buffer.find("\n\n") {
                        let event_data = buffer[..event_end].to_string();
                        buffer = buffer[event_end + 2..].to_string();

                        if let Some(response) = parse_sse_event(&event_data) {
                            yield Ok(response);
                        }
                    }
                }
                Err(e) => {
                    warn!("Stream error: {}", e);
                    yield Err(AdapterError::StreamProcessing(format!(
                        "stream read error: {}",
                        e
                    )));
                    break;
                }
            }
        }

        // The final event may arrive without a trailing \n\n
        if !buffer.trim().is_empty() {
            if let Some(response) = parse_sse_event(&buffer) {
                yield Ok(response);
            }
        }

        debug!("Gemini SSE stream ended");
    }
}

/// Parse a single SSE event into a GenerateContentResponse
fn parse_sse_event(event_data: &str) -> Option<GenerateContentResponse> {
    // SSE format: "event: <name>\ndata: <json>" or just "data: <json>"
    let data = event_data
        .lines()
        .find_map(|line| line.strip_prefix("data:"))
        .map(str::trim)?;

    // Skip empty data or "[DONE]" marker
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<GenerateContentResponse>(data) {
        Ok(response) => Some(response),
        Err(e) => {
            warn!("Failed to parse SSE chunk: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sse_event() {
        let event = "event: message\ndata: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\" Hello\"}]}}]}";
        let result = parse_sse_event(event).unwrap();
        assert_eq!(result.text().as_deref(), Some(" Hello"));
    }

    #[test]
    fn test_parse_sse_event_no_data() {
        let event = "event: ping";
        assert!(parse_sse_event(event).is_none());
    }

    #[test]
    fn test_parse_sse_event_done_marker() {
        assert!(parse_sse_event("data: [DONE]").is_none());
    }

    #[tokio::test]
    async fn test_parse_sse_stream_splits_events() {
        use futures::StreamExt;

        let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"He\"}]}}]}\n\ndata: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"llo\"}]}}]}\n\n";
        // Split mid-event to exercise buffering across byte chunks.
        let (first, second) = body.split_at(30);
        let byte_stream = futures::stream::iter(vec![
            Ok::<bytes::Bytes, reqwest::Error>(bytes::Bytes::from(first.to_string())),
            Ok(bytes::Bytes::from(second.to_string())),
        ]);

        let chunks: Vec<_> = parse_sse_stream(byte_stream).collect().await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(
            chunks[0].as_ref().unwrap().text().as_deref(),
            Some("He")
        );
        assert_eq!(
            chunks[1].as_ref().unwrap().text().as_deref(),
            Some("llo")
        );
    }

    #[tokio::test]
    async fn test_parse_sse_stream_flushes_trailing_event() {
        use futures::StreamExt;

        let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"end\"}]}}]}";
        let byte_stream = futures::stream::iter(vec![Ok::<bytes::Bytes, reqwest::Error>(
            bytes::Bytes::from(body.to_string()),
        )]);

        let chunks: Vec<_> = parse_sse_stream(byte_stream).collect().await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().text().as_deref(), Some("end"));
    }
}
