//! Data models for the framework-facing and Gemini-facing sides.
//!
//! - `agent`: framework-neutral messages, options, usage, and steps.
//! - `gemini`: the upstream Gemini generateContent wire types.

pub mod agent;
pub mod gemini;

pub use agent::{
    ContentPart, GenerationOptions, Message, MessageContent, StepResult, UsageInfo,
};
pub use gemini::{
    Candidate, Content, GeminiRole, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part, PromptFeedback, SafetySetting, UsageMetadata,
};
