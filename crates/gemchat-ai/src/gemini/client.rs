//! Gemini API client struct, request building, and response parsing.

use gemchat_common::ConfigError;
use serde::Deserialize;

use crate::reply::{GenerateRequest, GenerationConfig, Reply};
use crate::AiError;

use super::config::GeminiConfig;

/// Gemini API client.
///
/// Cheap to share: the underlying `reqwest::Client` pools connections and
/// is safe for concurrent use.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::BackendInit(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Apply configured generation settings unless the request brings its own.
    pub(crate) fn build_request_body(&self, request: &GenerateRequest) -> GenerateRequest {
        let mut body = request.clone();
        if body.generation_config.is_none() {
            let generation = GenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            };
            if !generation.is_empty() {
                body.generation_config = Some(generation);
            }
        }
        body
    }

    /// Map a non-success HTTP status and body to an error.
    pub(crate) fn classify_error(status: reqwest::StatusCode, body: &str) -> AiError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status.as_u16() {
            401 | 403 => AiError::Auth(format!("HTTP {status}: {message}")),
            429 => AiError::RateLimited,
            _ => AiError::ApiError(format!("HTTP {status}: {message}")),
        }
    }

    /// Parse a Gemini response body.
    pub(crate) fn parse_response(body: &str) -> Result<Reply, AiError> {
        serde_json::from_str(body).map_err(|e| AiError::ParseError(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
