//! Configuration data structures for the adapter.
//!
//! This module defines the schema for adapter settings: backend
//! credentials, upstream connection parameters, and the translation
//! policy knobs.

use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, Result};

/// The root configuration object for the adapter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdapterConfig {
    /// Backend credentials (API key or Vertex triple).
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Upstream Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Translation policy knobs.
    #[serde(default)]
    pub translation: TranslationConfig,
}

impl AdapterConfig {
    /// Shorthand for the common direct-API-key setup.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            credentials: CredentialsConfig {
                api_key: Some(api_key.into()),
                vertex: None,
            },
            ..Default::default()
        }
    }

    /// Validate that the configuration can authenticate against the
    /// backend. Called at adapter construction; a failure here is fatal and
    /// never retried.
    pub fn validate(&self) -> Result<()> {
        self.credentials.validate()
    }
}

/// Backend credentials: a direct API key, or a complete alternate-endpoint
/// (Vertex) triple. At least one must be present.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CredentialsConfig {
    /// Direct API key for the generative-language endpoint.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Alternate-endpoint credentials.
    #[serde(default)]
    pub vertex: Option<VertexConfig>,
}

impl CredentialsConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Ok(());
            }
        }
        if let Some(vertex) = &self.vertex {
            if vertex.is_complete() {
                return Ok(());
            }
            return Err(AdapterError::Configuration(
                "Vertex credentials require project_id, location, and access_token".to_string(),
            ));
        }
        Err(AdapterError::Configuration(
            "No credentials: set an API key or a complete Vertex credential triple".to_string(),
        ))
    }
}

/// Alternate-endpoint credential triple. The adapter never runs an OAuth
/// flow; the access token is minted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VertexConfig {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub access_token: String,
}

impl VertexConfig {
    pub fn is_complete(&self) -> bool {
        !self.project_id.is_empty() && !self.location.is_empty() && !self.access_token.is_empty()
    }
}

/// Settings for the upstream Gemini API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for the generative-language API.
    /// Default: the public endpoint.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Connection and request timeout in seconds.
    /// Default: `300` (5 minutes)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// What to do with a content part the translator does not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPartPolicy {
    /// Drop the part and record a diagnostic.
    #[default]
    Drop,
    /// Replace the part with a visible placeholder text part.
    Placeholder,
}

/// What to do with a message role the mapper does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownRolePolicy {
    /// Fail the whole translation before any network call.
    #[default]
    Fail,
    /// Map to `user` and record a diagnostic.
    DefaultUser,
}

/// Translation policy knobs. One policy object serves every call site, so
/// the two content paths cannot diverge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct TranslationConfig {
    #[serde(default)]
    pub on_unsupported_part: UnsupportedPartPolicy,

    #[serde(default)]
    pub on_unknown_role: UnknownRolePolicy,
}

/// Default public generative-language endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// Helper functions for serde defaults and shared constants

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    300
}
