//! The adapter facade exposed to the agent framework.
//!
//! `GeminiProvider` owns the one process-lifetime backend client; every
//! call allocates its own translation diagnostics and (for streaming) its
//! own accumulation state, so concurrent calls against one provider are
//! independent.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::Stream;
use futures::StreamExt;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{AdapterConfig, TranslationConfig};
use crate::diagnostics::{Diagnostics, Severity};
use crate::error::{AdapterError, Result};
use crate::gemini::GeminiClient;
use crate::models::agent::{GenerationOptions, Message, StepResult, UsageInfo};
use crate::models::gemini::GenerateContentResponse;
use crate::translation::{build_request, normalize_response, synthesize_step, StreamNormalizer};

/// Per-chunk callback; receives a step carrying the chunk's own text and
/// usage.
pub type ChunkCallback = Arc<dyn Fn(&StepResult) + Send + Sync>;
/// Step-completion callback; receives the completed (or accumulated) step.
pub type StepCallback = Arc<dyn Fn(&StepResult) + Send + Sync>;
/// Finish callback; receives the full accumulated text.
pub type FinishCallback = Arc<dyn Fn(&str) + Send + Sync>;
/// Error callback; invoked before the error is propagated on the stream.
pub type ErrorCallback = Arc<dyn Fn(&AdapterError) + Send + Sync>;

/// Options for a single-shot text generation call.
#[derive(Default)]
pub struct GenerateTextOptions {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
    pub on_step_finish: Option<StepCallback>,
}

impl GenerateTextOptions {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }
}

/// Result of a single-shot text generation call.
#[derive(Debug)]
pub struct GenerateTextResult {
    pub text: String,
    pub usage: Option<UsageInfo>,
    pub finish_reason: Option<String>,
    /// The raw backend response object, untranslated.
    pub raw_response: GenerateContentResponse,
    pub diagnostics: Diagnostics,
}

/// Options for a streaming text generation call.
#[derive(Default)]
pub struct StreamTextOptions {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
    pub on_chunk: Option<ChunkCallback>,
    pub on_step_finish: Option<StepCallback>,
    pub on_finish: Option<FinishCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl StreamTextOptions {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }
}

/// The normalized output stream: one item per non-empty backend chunk, in
/// backend order. Lazy, single-consumption, never restartable.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Handle to a streaming call.
pub struct StreamTextResult {
    pub text_stream: TextStream,
    /// Cooperative cancellation handle for the stream.
    pub cancellation: StreamCancellation,
}

/// Cooperative cancellation flag, checked between chunk-consumption
/// suspension points. Best-effort: the backend sequence has no native
/// cancellation primitive, so upstream production may continue after local
/// cancellation.
#[derive(Debug, Clone, Default)]
pub struct StreamCancellation {
    cancelled: Arc<AtomicBool>,
}

impl StreamCancellation {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Options for the (unimplemented) structured-object generation modes.
#[derive(Default)]
pub struct GenerateObjectOptions {
    pub model: String,
    pub messages: Vec<Message>,
    pub schema: Value,
    pub options: GenerationOptions,
}

/// Gemini provider adapter.
pub struct GeminiProvider {
    client: Arc<GeminiClient>,
    translation: TranslationConfig,
}

impl GeminiProvider {
    /// Construct the adapter. Fails with a `Configuration` error when
    /// neither an API key nor a complete Vertex credential triple is
    /// configured; nothing else is callable before this succeeds.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        config.validate()?;
        let client = GeminiClient::new(&config.gemini, &config.credentials)?;
        info!("Gemini provider initialized");
        Ok(Self {
            client: Arc::new(client),
            translation: config.translation,
        })
    }

    /// Construct from environment / config file via `AdapterConfig::load`.
    pub fn from_env() -> Result<Self> {
        Self::new(AdapterConfig::load()?)
    }

    /// Single-shot text generation.
    ///
    /// Translation failures surface before any network I/O. When a step
    /// callback is registered and the response text is non-empty, one step
    /// is synthesized and delivered exactly once, before returning.
    pub async fn generate_text(&self, options: GenerateTextOptions) -> Result<GenerateTextResult> {
        let mut diagnostics = Diagnostics::new();

        let request = build_request(
            &options.messages,
            &options.options,
            &self.translation,
            &mut diagnostics,
        )?;

        let raw_response = self.client.generate_content(request, &options.model).await?;
        let normalized = normalize_response(&raw_response);

        if let Some(callback) = &options.on_step_finish {
            if let Some(step) = synthesize_step(&normalized) {
                callback(&step);
            }
        }

        log_diagnostics(&diagnostics);

        Ok(GenerateTextResult {
            text: normalized.text,
            usage: normalized.usage,
            finish_reason: normalized.finish_reason,
            raw_response,
            diagnostics,
        })
    }

    /// Streaming text generation.
    ///
    /// Returns immediately; the request is submitted on first poll of the
    /// output stream. Chunk text, callbacks, and the terminal step follow
    /// the backend's delivery order with no reordering or batching; all
    /// per-stream state lives inside the returned stream and dies with it.
    pub fn stream_text(&self, options: StreamTextOptions) -> StreamTextResult {
        let cancellation = StreamCancellation::default();
        let cancel = cancellation.clone();
        let client = Arc::clone(&self.client);
        let translation = self.translation;

        let stream = async_stream::stream! {
            let mut diagnostics = Diagnostics::new();
            let mut normalizer = StreamNormalizer::new();

            // Translation failures are synchronous; no I/O has happened.
            let request = match build_request(
                &options.messages,
                &options.options,
                &translation,
                &mut diagnostics,
            ) {
                Ok(request) => request,
                Err(error) => {
                    if let Some(callback) = &options.on_error {
                        callback(&error);
                    }
                    yield Err(error);
                    return;
                }
            };

            let mut backend = match client
                .stream_generate_content(request, &options.model)
                .await
            {
                Ok(stream) => stream,
                Err(error) => {
                    normalizer.fail();
                    if let Some(callback) = &options.on_error {
                        callback(&error);
                    }
                    yield Err(error);
                    return;
                }
            };

            loop {
                // Cancellation is checked between chunk suspension points;
                // the backend may keep producing after we stop consuming.
                if cancel.is_cancelled() {
                    normalizer.cancel();
                    debug!("stream cancelled by caller");
                    break;
                }

                let chunk = match backend.next().await {
                    Some(Ok(chunk)) => chunk,
                    Some(Err(error)) => {
                        // Error path: never fire the terminal success
                        // callbacks after this.
                        normalizer.fail();
                        if let Some(callback) = &options.on_error {
                            callback(&error);
                        }
                        log_diagnostics(&diagnostics);
                        yield Err(error);
                        return;
                    }
                    None => break,
                };

                let outcome = normalizer.on_chunk(&chunk, &mut diagnostics);

                if let Some(text) = outcome.text {
                    yield Ok(text);
                }
                if let Some(step) = outcome.step {
                    if let Some(callback) = &options.on_chunk {
                        callback(&step);
                    }
                }
            }

            // Terminal step fires exactly once, strictly after the last
            // per-chunk callback; `finish` returns None after cancellation.
            if let Some(outcome) = normalizer.finish() {
                if let Some(callback) = &options.on_step_finish {
                    callback(&outcome.step);
                }
                if let Some(callback) = &options.on_finish {
                    callback(&outcome.text);
                }
            }

            log_diagnostics(&diagnostics);
        };

        StreamTextResult {
            text_stream: Box::pin(stream),
            cancellation,
        }
    }

    /// Structured-object generation is not implemented; fails immediately.
    pub async fn generate_object(
        &self,
        _options: GenerateObjectOptions,
    ) -> Result<GenerateTextResult> {
        Err(AdapterError::NotImplemented(
            "structured-object generation (generate_object)".to_string(),
        ))
    }

    /// Streaming structured-object generation is not implemented; fails
    /// immediately.
    pub fn stream_object(&self, _options: GenerateObjectOptions) -> Result<StreamTextResult> {
        Err(AdapterError::NotImplemented(
            "structured-object generation (stream_object)".to_string(),
        ))
    }
}

/// Forward collected diagnostics to the process log at the provider edge.
fn log_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        match diagnostic.severity {
            Severity::Warning => warn!("{}", diagnostic.message),
            Severity::Info => info!("{}", diagnostic.message),
        }
    }
}
