//! Framework-neutral message and result types.
//!
//! These are the shapes the conversational-agent framework hands to the
//! adapter (messages, generation options) and receives back (usage, steps).
//! Roles are open strings; anything the role mapper cannot coerce is
//! subject to the configured unknown-role policy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::gemini::SafetySetting;

/// A single message in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Sender role: "user", "assistant", "system", "tool", or a
    /// framework-specific value.
    pub role: String,
    /// The content of the message.
    pub content: MessageContent,
}

impl Message {
    pub fn text(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: MessageContent::Text(text.into()),
        }
    }
}

/// Message content - simple text or an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Content part types.
///
/// Only `Text` is translated; every other variant is an unsupported-part
/// marker handled by the configured policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A text content part.
    Text { text: String },
    /// An image part (untranslated; source is opaque to the adapter).
    Image { source: Value },
    /// A file attachment part (untranslated).
    File { source: Value },
    /// A tool invocation requested by the model (untranslated).
    ToolCall {
        id: String,
        name: String,
        arguments: Value,
    },
    /// Result of a tool execution (untranslated).
    ToolResult {
        tool_call_id: String,
        content: String,
    },
}

impl ContentPart {
    /// Tag name used in diagnostics for unsupported parts.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentPart::Text { .. } => "text",
            ContentPart::Image { .. } => "image",
            ContentPart::File { .. } => "file",
            ContentPart::ToolCall { .. } => "tool_call",
            ContentPart::ToolResult { .. } => "tool_result",
        }
    }
}

/// Generation knobs, all optional.
///
/// `extra` is an open-ended escape hatch merged into the wire config last;
/// duplicating a named knob there is caller error (the extra value wins and
/// a diagnostic is recorded).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub stop_sequences: Option<Vec<String>>,
    pub seed: Option<i64>,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub candidate_count: Option<u32>,
    pub response_mime_type: Option<String>,
    pub response_schema: Option<Value>,
    pub safety_settings: Option<Vec<SafetySetting>>,
    /// Additional wire-level config keys, merged after the named knobs.
    pub extra: Map<String, Value>,
}

/// Token accounting for one request/response.
///
/// Only materialized when at least one count is non-zero; "no usage
/// reported" and "all-zero usage" are deliberately indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One observable unit of produced content, delivered through the step
/// callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: String,
    pub content: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageInfo>,
}

impl StepResult {
    /// Synthesize a text step attributed to the assistant.
    pub fn text(content: impl Into<String>, usage: Option<UsageInfo>) -> Self {
        Self {
            id: format!("step_{}", uuid::Uuid::new_v4().simple()),
            step_type: "text".to_string(),
            content: content.into(),
            role: "assistant".to_string(),
            usage,
        }
    }
}
