// Response normalization (Gemini → framework result model)

use crate::models::agent::{StepResult, UsageInfo};
use crate::models::gemini::{GenerateContentResponse, UsageMetadata};
use tracing::debug;

/// Extract usage accounting from backend metadata.
///
/// Missing sub-fields default to 0 and every count is coerced to a
/// non-negative integer. An all-zero result is reported as absent: a usage
/// object that carries no information is indistinguishable from a backend
/// that omitted metadata entirely, and stays that way.
pub fn extract_usage(metadata: Option<&UsageMetadata>) -> Option<UsageInfo> {
    let metadata = metadata?;

    let coerce = |count: Option<i64>| count.unwrap_or(0).max(0) as u32;
    let usage = UsageInfo {
        prompt_tokens: coerce(metadata.prompt_token_count),
        completion_tokens: coerce(metadata.candidates_token_count),
        total_tokens: coerce(metadata.total_token_count),
    };

    if usage.prompt_tokens == 0 && usage.completion_tokens == 0 && usage.total_tokens == 0 {
        None
    } else {
        Some(usage)
    }
}

/// Normalized view of one complete backend response.
#[derive(Debug, Clone)]
pub struct NormalizedResponse {
    /// The backend's concatenated text view; empty string when the backend
    /// produced none (never absent).
    pub text: String,
    pub usage: Option<UsageInfo>,
    /// First candidate's finish reason, stringified; absent when there are
    /// no candidates.
    pub finish_reason: Option<String>,
}

/// Normalize a single-shot backend response.
pub fn normalize_response(response: &GenerateContentResponse) -> NormalizedResponse {
    let normalized = NormalizedResponse {
        text: response.text().unwrap_or_default(),
        usage: extract_usage(response.usage_metadata.as_ref()),
        finish_reason: response.finish_reason(),
    };
    debug!(
        "Normalized response: {} chars, finish reason: {:?}",
        normalized.text.len(),
        normalized.finish_reason
    );
    normalized
}

/// Synthesize the one completion step for a single-shot response.
///
/// Returns `None` for empty text; the step callback is skipped in that
/// case. The role is fixed to `assistant` here, not routed through the
/// request-side role mapper.
pub fn synthesize_step(normalized: &NormalizedResponse) -> Option<StepResult> {
    if normalized.text.is_empty() {
        return None;
    }
    Some(StepResult::text(normalized.text.clone(), normalized.usage))
}
