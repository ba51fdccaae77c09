// Request translation (framework messages → Gemini)

use crate::config::{TranslationConfig, UnknownRolePolicy, UnsupportedPartPolicy};
use crate::diagnostics::Diagnostics;
use crate::error::{AdapterError, Result};
use crate::models::agent::{ContentPart, GenerationOptions, Message, MessageContent};
use crate::models::gemini::{
    Content, GeminiRole, GenerateContentRequest, GenerationConfig, Part,
};
use tracing::debug;

/// Text substituted for an unsupported part under the placeholder policy.
pub const UNSUPPORTED_PART_PLACEHOLDER: &str = "[unsupported content]";

/// Map a framework role onto the backend's two-role model.
///
/// `system` and `tool` coerce to `model` with a diagnostic: the backend has
/// no native system-role semantics, and tool results would need a dedicated
/// part type this translator does not build yet. Unknown roles follow the
/// configured policy.
pub fn map_role(
    role: &str,
    policy: UnknownRolePolicy,
    diagnostics: &mut Diagnostics,
) -> Result<GeminiRole> {
    match role {
        "user" => Ok(GeminiRole::User),
        "assistant" => Ok(GeminiRole::Model),
        "system" => {
            diagnostics.warn(
                "system role is not distinguished by the backend's two-role model; mapping to 'model'",
            );
            Ok(GeminiRole::Model)
        }
        "tool" => {
            diagnostics.warn(
                "tool results are not translated to a dedicated part type; mapping role to 'model'",
            );
            Ok(GeminiRole::Model)
        }
        other => match policy {
            UnknownRolePolicy::Fail => Err(AdapterError::UnsupportedRole(other.to_string())),
            UnknownRolePolicy::DefaultUser => {
                diagnostics.warn(format!("unknown role '{}' defaulted to 'user'", other));
                Ok(GeminiRole::User)
            }
        },
    }
}

/// Translate one message into a backend content unit.
pub fn translate_message(
    message: &Message,
    policy: &TranslationConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Content> {
    let role = map_role(&message.role, policy.on_unknown_role, diagnostics)?;

    let parts = match &message.content {
        MessageContent::Text(text) => vec![Part::text(text.clone())],
        MessageContent::Parts(parts) => {
            translate_parts(parts, policy.on_unsupported_part, diagnostics)
        }
    };

    Ok(Content { role, parts })
}

/// Translate a structured part list. Single path for every call site, so
/// the unsupported-part policy cannot diverge between them.
fn translate_parts(
    parts: &[ContentPart],
    policy: UnsupportedPartPolicy,
    diagnostics: &mut Diagnostics,
) -> Vec<Part> {
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            ContentPart::Text { text } => out.push(Part::text(text.clone())),
            unsupported => match policy {
                UnsupportedPartPolicy::Drop => {
                    diagnostics.warn(format!(
                        "dropping unsupported '{}' content part",
                        unsupported.kind()
                    ));
                }
                UnsupportedPartPolicy::Placeholder => {
                    diagnostics.warn(format!(
                        "replacing unsupported '{}' content part with a placeholder",
                        unsupported.kind()
                    ));
                    out.push(Part::text(UNSUPPORTED_PART_PLACEHOLDER));
                }
            },
        }
    }

    // The backend rejects empty part lists; a message whose parts were all
    // dropped still has to produce a content unit.
    if out.is_empty() {
        out.push(Part::text(""));
    }

    out
}

/// Build the backend request from the full message list and options.
///
/// Message order is the dialogue history and is preserved exactly. Pure:
/// no side effects, no network I/O.
pub fn build_request(
    messages: &[Message],
    options: &GenerationOptions,
    policy: &TranslationConfig,
    diagnostics: &mut Diagnostics,
) -> Result<GenerateContentRequest> {
    let contents = messages
        .iter()
        .map(|message| translate_message(message, policy, diagnostics))
        .collect::<Result<Vec<_>>>()?;

    let generation_config = build_generation_config(options, diagnostics);

    debug!(
        "Built request: {} contents, config: {}, safety settings: {}",
        contents.len(),
        generation_config.is_some(),
        options.safety_settings.is_some()
    );

    Ok(GenerateContentRequest {
        contents,
        generation_config,
        safety_settings: options.safety_settings.clone(),
    })
}

/// Build the generation config from the defined knobs, merging the
/// extra-options bag last. Absent knobs are omitted, never sent as null.
/// Returns `None` when nothing is set, to avoid a vacuous config block.
fn build_generation_config(
    options: &GenerationOptions,
    diagnostics: &mut Diagnostics,
) -> Option<GenerationConfig> {
    let mut config = GenerationConfig {
        temperature: options.temperature,
        top_p: options.top_p,
        top_k: options.top_k,
        stop_sequences: options.stop_sequences.clone(),
        seed: options.seed,
        presence_penalty: options.presence_penalty,
        frequency_penalty: options.frequency_penalty,
        max_output_tokens: options.max_output_tokens,
        candidate_count: options.candidate_count,
        response_mime_type: options.response_mime_type.clone(),
        response_schema: options.response_schema.clone(),
        extra: Default::default(),
    };

    for (key, value) in &options.extra {
        // Duplicating a named knob in extra is caller error; the extra
        // value wins and the named slot is cleared so no duplicate key
        // reaches the wire.
        if config.clear_named(key) {
            diagnostics.warn(format!(
                "extra option '{}' duplicates a named generation knob; the extra value wins",
                key
            ));
        }
        config.extra.insert(key.clone(), value.clone());
    }

    if config.is_empty() {
        None
    } else {
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy() -> TranslationConfig {
        TranslationConfig::default()
    }

    #[test]
    fn test_simple_message_translation() {
        let message = Message::text("user", "Hello, world!");
        let mut diags = Diagnostics::new();

        let content = translate_message(&message, &policy(), &mut diags).unwrap();

        assert_eq!(content.role, GeminiRole::User);
        assert_eq!(content.parts.len(), 1);
        assert_eq!(content.parts[0].text.as_deref(), Some("Hello, world!"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_role_mapping() {
        let mut diags = Diagnostics::new();

        assert_eq!(
            map_role("user", UnknownRolePolicy::Fail, &mut diags).unwrap(),
            GeminiRole::User
        );
        assert_eq!(
            map_role("assistant", UnknownRolePolicy::Fail, &mut diags).unwrap(),
            GeminiRole::Model
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_system_role_is_lossy_with_diagnostic() {
        let mut diags = Diagnostics::new();
        let role = map_role("system", UnknownRolePolicy::Fail, &mut diags).unwrap();
        assert_eq!(role, GeminiRole::Model);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_tool_role_maps_to_model_with_diagnostic() {
        let mut diags = Diagnostics::new();
        let role = map_role("tool", UnknownRolePolicy::Fail, &mut diags).unwrap();
        assert_eq!(role, GeminiRole::Model);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_unknown_role_fails_by_default() {
        let mut diags = Diagnostics::new();
        let result = map_role("narrator", UnknownRolePolicy::Fail, &mut diags);
        assert!(matches!(result, Err(AdapterError::UnsupportedRole(_))));
    }

    #[test]
    fn test_unknown_role_default_user_policy() {
        let mut diags = Diagnostics::new();
        let role = map_role("narrator", UnknownRolePolicy::DefaultUser, &mut diags).unwrap();
        assert_eq!(role, GeminiRole::User);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_multi_part_order_preserved() {
        let message = Message {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: "First".to_string(),
                },
                ContentPart::Text {
                    text: "Second".to_string(),
                },
            ]),
        };
        let mut diags = Diagnostics::new();

        let content = translate_message(&message, &policy(), &mut diags).unwrap();

        assert_eq!(content.parts.len(), 2);
        assert_eq!(content.parts[0].text.as_deref(), Some("First"));
        assert_eq!(content.parts[1].text.as_deref(), Some("Second"));
    }

    #[test]
    fn test_all_parts_dropped_leaves_one_empty_part() {
        let message = Message {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![ContentPart::Image {
                source: json!({"url": "https://example.com/a.png"}),
            }]),
        };
        let mut diags = Diagnostics::new();

        let content = translate_message(&message, &policy(), &mut diags).unwrap();

        // Never an empty parts list; the backend rejects those.
        assert_eq!(content.parts.len(), 1);
        assert_eq!(content.parts[0].text.as_deref(), Some(""));
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_placeholder_policy_substitutes_marker() {
        let message = Message {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: "look:".to_string(),
                },
                ContentPart::Image {
                    source: json!({"url": "https://example.com/a.png"}),
                },
            ]),
        };
        let translation = TranslationConfig {
            on_unsupported_part: UnsupportedPartPolicy::Placeholder,
            ..Default::default()
        };
        let mut diags = Diagnostics::new();

        let content = translate_message(&message, &translation, &mut diags).unwrap();

        assert_eq!(content.parts.len(), 2);
        assert_eq!(
            content.parts[1].text.as_deref(),
            Some(UNSUPPORTED_PART_PLACEHOLDER)
        );
    }

    #[test]
    fn test_build_request_preserves_message_order() {
        let messages = vec![
            Message::text("user", "one"),
            Message::text("assistant", "two"),
            Message::text("user", "three"),
        ];
        let mut diags = Diagnostics::new();

        let request =
            build_request(&messages, &GenerationOptions::default(), &policy(), &mut diags)
                .unwrap();

        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role, GeminiRole::User);
        assert_eq!(request.contents[1].role, GeminiRole::Model);
        assert_eq!(request.contents[0].parts[0].text.as_deref(), Some("one"));
        assert_eq!(request.contents[2].parts[0].text.as_deref(), Some("three"));
    }

    #[test]
    fn test_empty_options_omit_config_entirely() {
        let messages = vec![Message::text("user", "hi")];
        let mut diags = Diagnostics::new();

        let request =
            build_request(&messages, &GenerationOptions::default(), &policy(), &mut diags)
                .unwrap();

        assert!(request.generation_config.is_none());
        assert!(request.safety_settings.is_none());
    }

    #[test]
    fn test_defined_knobs_only() {
        let options = GenerationOptions {
            temperature: Some(0.5),
            max_output_tokens: Some(1024),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();

        let request =
            build_request(&[Message::text("user", "hi")], &options, &policy(), &mut diags)
                .unwrap();

        let config = request.generation_config.unwrap();
        let json = serde_json::to_value(&config).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["temperature"], json!(0.5));
        assert_eq!(map["maxOutputTokens"], json!(1024));
    }

    #[test]
    fn test_extra_options_merge_last() {
        let mut options = GenerationOptions {
            temperature: Some(0.5),
            ..Default::default()
        };
        options
            .extra
            .insert("responseLogprobs".to_string(), json!(true));
        let mut diags = Diagnostics::new();

        let request =
            build_request(&[Message::text("user", "hi")], &options, &policy(), &mut diags)
                .unwrap();

        let json = serde_json::to_value(request.generation_config.unwrap()).unwrap();
        assert_eq!(json["temperature"], json!(0.5));
        assert_eq!(json["responseLogprobs"], json!(true));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_duplicated_extra_knob_wins_with_diagnostic() {
        let mut options = GenerationOptions {
            temperature: Some(0.5),
            ..Default::default()
        };
        options.extra.insert("temperature".to_string(), json!(0.9));
        let mut diags = Diagnostics::new();

        let request =
            build_request(&[Message::text("user", "hi")], &options, &policy(), &mut diags)
                .unwrap();

        let json = serde_json::to_value(request.generation_config.unwrap()).unwrap();
        assert_eq!(json["temperature"], json!(0.9));
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_unknown_role_aborts_whole_request() {
        let messages = vec![
            Message::text("user", "fine"),
            Message::text("narrator", "not fine"),
        ];
        let mut diags = Diagnostics::new();

        let result =
            build_request(&messages, &GenerationOptions::default(), &policy(), &mut diags);

        assert!(matches!(result, Err(AdapterError::UnsupportedRole(_))));
    }
}
