// agent2gemini - Gemini provider adapter for conversational-agent frameworks

//! Translates a framework-neutral message/options model into Gemini
//! `generateContent` requests, and normalizes single-shot and streamed
//! responses back into the framework's result/step model with consistent
//! usage accounting, finish-reason reporting, and step callbacks.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gemini;
pub mod models;
pub mod provider;
pub mod translation;

pub use config::{AdapterConfig, TranslationConfig, UnknownRolePolicy, UnsupportedPartPolicy};
pub use error::{AdapterError, Result};
pub use models::agent::{
    ContentPart, GenerationOptions, Message, MessageContent, StepResult, UsageInfo,
};
pub use provider::{
    GeminiProvider, GenerateObjectOptions, GenerateTextOptions, GenerateTextResult,
    StreamCancellation, StreamTextOptions, StreamTextResult,
};
