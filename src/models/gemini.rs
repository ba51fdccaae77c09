// Gemini generateContent wire type definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AdapterError, Result};

/// Wire-level role. The backend's conversation model only knows these two;
/// the role mapper coerces everything else or fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeminiRole {
    User,
    Model,
}

impl GeminiRole {
    /// Validate a role string coming back from the backend.
    pub fn parse(role: &str) -> Result<Self> {
        match role {
            "user" => Ok(GeminiRole::User),
            "model" => Ok(GeminiRole::Model),
            other => Err(AdapterError::InvalidRole(other.to_string())),
        }
    }
}

impl Default for GeminiRole {
    // Responses sometimes omit the role on model turns.
    fn default() -> Self {
        GeminiRole::Model
    }
}

/// Content in a turn (user or model).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: GeminiRole,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Individual part of content in a request or response.
///
/// Response parts that carry non-text payloads (function calls, inline
/// data) deserialize with `text: None` and are ignored by the text view.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Generation configuration. Only defined knobs are serialized; `extra`
/// carries caller-supplied wire keys and is flattened after the named
/// fields. The request builder guarantees `extra` never shadows a named
/// key, so no duplicate keys reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerationConfig {
    /// True when no knob is set and no extra key is present; an empty
    /// config is omitted from the request entirely.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.top_k.is_none()
            && self.stop_sequences.is_none()
            && self.seed.is_none()
            && self.presence_penalty.is_none()
            && self.frequency_penalty.is_none()
            && self.max_output_tokens.is_none()
            && self.candidate_count.is_none()
            && self.response_mime_type.is_none()
            && self.response_schema.is_none()
            && self.extra.is_empty()
    }

    /// Clear the named field matching a wire key, returning whether one was
    /// set. Used by the builder when a caller duplicates a named knob in
    /// the extra-options bag.
    pub fn clear_named(&mut self, wire_key: &str) -> bool {
        match wire_key {
            "temperature" => self.temperature.take().is_some(),
            "topP" => self.top_p.take().is_some(),
            "topK" => self.top_k.take().is_some(),
            "stopSequences" => self.stop_sequences.take().is_some(),
            "seed" => self.seed.take().is_some(),
            "presencePenalty" => self.presence_penalty.take().is_some(),
            "frequencyPenalty" => self.frequency_penalty.take().is_some(),
            "maxOutputTokens" => self.max_output_tokens.take().is_some(),
            "candidateCount" => self.candidate_count.take().is_some(),
            "responseMimeType" => self.response_mime_type.take().is_some(),
            "responseSchema" => self.response_schema.take().is_some(),
            _ => false,
        }
    }
}

/// Safety setting, passed through to the backend untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// Gemini generateContent request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation history, in chronological order.
    pub contents: Vec<Content>,

    /// Generation parameters; omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,

    /// Safety settings; omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
}

/// Gemini generateContent response; one full object for single-shot calls,
/// one partial object per chunk when streaming.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text view over the first candidate's parts. `None` when
    /// there is no text at all; the normalizer maps that to an empty
    /// string.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        let mut out = String::new();
        let mut any = false;
        for part in &content.parts {
            if let Some(text) = &part.text {
                out.push_str(text);
                any = true;
            }
        }
        any.then_some(out)
    }

    /// First candidate's finish reason, stringified.
    pub fn finish_reason(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.clone())
    }
}

/// Response candidate.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_ratings: Option<Vec<Value>>,
}

/// Token usage metadata. Counts are kept signed at the wire boundary; the
/// usage extractor coerces them to non-negative integers.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<i64>,
}

/// Prompt feedback, surfaced as a non-fatal diagnostic during streaming.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_ratings: Option<Vec<Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&GeminiRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&GeminiRole::Model).unwrap(),
            "\"model\""
        );
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert!(GeminiRole::parse("model").is_ok());
        assert!(matches!(
            GeminiRole::parse("system"),
            Err(AdapterError::InvalidRole(_))
        ));
    }

    #[test]
    fn test_empty_config_serializes_to_empty_object() {
        let config = GenerationConfig::default();
        assert!(config.is_empty());
        assert_eq!(serde_json::to_string(&config).unwrap(), "{}");
    }

    #[test]
    fn test_config_omits_unset_knobs() {
        let config = GenerationConfig {
            temperature: Some(0.7),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("temperature"));
    }

    #[test]
    fn test_response_text_view() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi"},{"text":"!"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Hi!"));
    }

    #[test]
    fn test_response_text_absent_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.finish_reason(), None);
    }

    #[test]
    fn test_non_text_parts_deserialize_as_empty() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"functionCall":{"name":"f","args":{}}}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), None);
    }
}
