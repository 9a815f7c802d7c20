//! Model backend access for Gemchat.
//!
//! Provides:
//! - The `GenerativeBackend` contract and the Gemini implementation of it
//! - Typed request/reply wire shapes with per-part textual rendering
//! - `Session`, the single reusable entry point that runs one stateless
//!   exchange per call, honoring cancellation and deadlines

pub mod gemini;
pub mod reply;
pub mod serialized;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use async_trait::async_trait;

pub use gemini::{GeminiClient, GeminiConfig};
pub use reply::{Candidate, Content, GenerateRequest, GenerationConfig, Part, Reply};
pub use serialized::SerializedBackend;
pub use session::{flatten_reply, ExchangeContext, ExchangeError, Session};

/// A remote generative model.
///
/// Implementations must be safe to call from several tasks at once; wrap
/// one that is not in [`SerializedBackend`].
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Issue a single generate call.
    async fn generate(&self, request: &GenerateRequest) -> Result<Reply, AiError>;

    /// Model identifier this backend was configured with.
    fn model(&self) -> &str;
}

/// Why a backend call failed.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}
