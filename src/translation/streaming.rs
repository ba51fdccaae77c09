// Streaming normalization state machine

use crate::diagnostics::Diagnostics;
use crate::models::agent::{StepResult, UsageInfo};
use crate::models::gemini::GenerateContentResponse;
use crate::translation::response::extract_usage;
use tracing::debug;

/// Stream lifecycle. `Closed` and `Cancelled` are terminal: no further
/// chunk processing, no further callback delivery, late chunks discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Accepting chunks.
    Open,
    /// Terminal, reached on exhaustion or error.
    Closed,
    /// Terminal, reached on caller-initiated cancellation.
    Cancelled,
}

/// What one chunk produced while the stream was open.
#[derive(Debug, Default)]
pub struct ChunkOutcome {
    /// Text to emit on the output stream, when the chunk carried any.
    pub text: Option<String>,
    /// Step for the per-chunk callback. Carries this chunk's own usage,
    /// not the accumulated usage.
    pub step: Option<StepResult>,
}

/// The terminal result of a successfully exhausted stream.
#[derive(Debug)]
pub struct FinalOutcome {
    /// Step for the step-completion callback: full accumulated text plus
    /// the last-known usage.
    pub step: StepResult,
    /// Full accumulated text for the finish callback.
    pub text: String,
    pub usage: Option<UsageInfo>,
}

/// Per-stream accumulation state machine.
///
/// Owned exclusively by one in-flight stream and destroyed with it; the
/// adapter instance itself holds no per-call state.
#[derive(Debug)]
pub struct StreamNormalizer {
    state: StreamState,
    accumulated_text: String,
    final_usage: Option<UsageInfo>,
}

impl Default for StreamNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamNormalizer {
    pub fn new() -> Self {
        Self {
            state: StreamState::Open,
            accumulated_text: String::new(),
            final_usage: None,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn accumulated_text(&self) -> &str {
        &self.accumulated_text
    }

    pub fn final_usage(&self) -> Option<UsageInfo> {
        self.final_usage
    }

    /// Feed one backend chunk.
    ///
    /// Usage is last-writer-wins: the backend reports authoritative totals
    /// on its terminal chunk, so a later non-empty usage result supersedes
    /// earlier ones. Prompt feedback becomes a diagnostic and never aborts
    /// the stream by itself.
    pub fn on_chunk(
        &mut self,
        chunk: &GenerateContentResponse,
        diagnostics: &mut Diagnostics,
    ) -> ChunkOutcome {
        if self.state != StreamState::Open {
            debug!("discarding chunk delivered after stream terminated");
            return ChunkOutcome::default();
        }

        let chunk_usage = extract_usage(chunk.usage_metadata.as_ref());
        if chunk_usage.is_some() {
            self.final_usage = chunk_usage;
        }

        if let Some(feedback) = &chunk.prompt_feedback {
            let detail = feedback
                .block_reason
                .as_deref()
                .unwrap_or("safety ratings reported");
            diagnostics.warn(format!("prompt feedback from backend: {}", detail));
        }

        let chunk_text = chunk.text().unwrap_or_default();
        if chunk_text.is_empty() {
            return ChunkOutcome::default();
        }

        self.accumulated_text.push_str(&chunk_text);

        ChunkOutcome {
            step: Some(StepResult::text(chunk_text.clone(), chunk_usage)),
            text: Some(chunk_text),
        }
    }

    /// Backend sequence exhausted: transition to `Closed` and produce the
    /// terminal accumulated step. Fires exactly once; returns `None` when
    /// the stream already terminated (including cancellation).
    pub fn finish(&mut self) -> Option<FinalOutcome> {
        if self.state != StreamState::Open {
            return None;
        }
        self.state = StreamState::Closed;

        debug!(
            "stream closed: {} accumulated chars, usage present: {}",
            self.accumulated_text.len(),
            self.final_usage.is_some()
        );

        Some(FinalOutcome {
            step: StepResult::text(self.accumulated_text.clone(), self.final_usage),
            text: self.accumulated_text.clone(),
            usage: self.final_usage,
        })
    }

    /// Error while consuming the backend sequence: transition to `Closed`.
    /// The terminal success path must never fire after this.
    pub fn fail(&mut self) {
        if self.state == StreamState::Open {
            self.state = StreamState::Closed;
        }
    }

    /// Caller-initiated cancellation. Best-effort: the backend sequence has
    /// no native cancellation primitive, so this stops the adapter's own
    /// consumption and delivery, while upstream production may continue.
    pub fn cancel(&mut self) {
        if self.state == StreamState::Open {
            self.state = StreamState::Cancelled;
        }
    }
}
