// Gemini API client

use crate::config::{CredentialsConfig, GeminiConfig, DEFAULT_API_BASE_URL};
use crate::error::{AdapterError, Result};
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use futures::stream::Stream;
use reqwest::Client;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error};

/// Client for the Google Gemini API.
///
/// The one process-lifetime object of the adapter: constructed once and
/// reused for every call. Handles authentication headers and request
/// submission; retries, if any, belong to the caller.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
    credentials: CredentialsConfig,
}

impl GeminiClient {
    /// Create a new Gemini client with a pooled HTTP client.
    ///
    /// Credentials are assumed validated by the adapter constructor.
    pub fn new(config: &GeminiConfig, credentials: &CredentialsConfig) -> Result<Self> {
        // Configure HTTP client for streaming-friendly connections
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| AdapterError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client with connection pooling and keep-alive");

        Ok(Self {
            http_client,
            config: config.clone(),
            credentials: credentials.clone(),
        })
    }

    /// Build the endpoint URL for a model method (`generateContent` or
    /// `streamGenerateContent?alt=sse`).
    fn endpoint(&self, model: &str, method: &str) -> String {
        let base = self.config.api_base_url.trim_end_matches('/');
        match &self.credentials.vertex {
            Some(vertex) if self.credentials.api_key.is_none() => {
                // Vertex publishes models under the project/location path.
                // A non-default base URL overrides the regional host.
                let vertex_base = if self.config.api_base_url == DEFAULT_API_BASE_URL {
                    format!("https://{}-aiplatform.googleapis.com", vertex.location)
                } else {
                    base.to_string()
                };
                format!(
                    "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:{}",
                    vertex_base, vertex.project_id, vertex.location, model, method
                )
            }
            _ => format!("{}/v1beta/models/{}:{}", base, model, method),
        }
    }

    /// Attach the authentication header for the configured credential mode.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(api_key) = &self.credentials.api_key {
            request.header("x-goog-api-key", api_key)
        } else if let Some(vertex) = &self.credentials.vertex {
            request.header("Authorization", format!("Bearer {}", vertex.access_token))
        } else {
            request
        }
    }

    /// Call the `generateContent` API (single-shot).
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
        model: &str,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(model, "generateContent");
        debug!("Calling generateContent API for model: {}", model);

        let response = self
            .authorize(self.http_client.post(&url))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AdapterError::Api(format!("HTTP error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Gemini API error: HTTP {} - Response body: {}",
                status, error_text
            );
            return Err(AdapterError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| AdapterError::Api(format!("Failed to read response body: {}", e)))?;

        let gemini_response: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| {
                error!("Failed to parse Gemini response: {}", e);
                AdapterError::Api(format!("Response parsing error: {}", e))
            })?;

        debug!("Successfully received Gemini response");
        Ok(gemini_response)
    }

    /// Call the `streamGenerateContent` API for SSE streaming.
    ///
    /// Returns a lazy, finite, forward-only sequence of partial response
    /// objects.
    pub async fn stream_generate_content(
        &self,
        request: GenerateContentRequest,
        model: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>> {
        let url = self.endpoint(model, "streamGenerateContent?alt=sse");
        debug!("Calling streamGenerateContent API for model: {}", model);

        let request_body = serde_json::to_string(&request)?;

        let builder = self
            .authorize(self.http_client.post(&url))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .body(request_body);

        super::streaming::stream_generate_content(builder).await
    }
}
