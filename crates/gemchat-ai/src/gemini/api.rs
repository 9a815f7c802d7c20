//! GenerativeBackend implementation for GeminiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::reply::{GenerateRequest, Reply};
use crate::{AiError, GenerativeBackend};

use super::client::GeminiClient;

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<Reply, AiError> {
        let body = self.build_request_body(request);
        let url = self.api_url();

        debug!(model = %self.config.model, "Gemini API request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AiError::NetworkError(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(GeminiClient::classify_error(status, &text));
        }

        let reply = GeminiClient::parse_response(&text)?;
        if let Some(usage) = &reply.usage_metadata {
            debug!(
                model = %self.config.model,
                input_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini API response"
            );
        }
        Ok(reply)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
