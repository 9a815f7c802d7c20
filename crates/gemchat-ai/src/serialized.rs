//! One-at-a-time access to a backend that is not safe for concurrent use.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::reply::{GenerateRequest, Reply};
use crate::{AiError, GenerativeBackend};

/// Serializes calls into `B` through an async mutex.
///
/// Callers queue in FIFO order; a caller that is cancelled while waiting
/// gives up its place without touching the backend.
pub struct SerializedBackend<B> {
    model: String,
    inner: Mutex<B>,
}

impl<B: GenerativeBackend> SerializedBackend<B> {
    pub fn new(backend: B) -> Self {
        Self {
            model: backend.model().to_string(),
            inner: Mutex::new(backend),
        }
    }

    pub fn into_inner(self) -> B {
        self.inner.into_inner()
    }
}

#[async_trait]
impl<B: GenerativeBackend> GenerativeBackend for SerializedBackend<B> {
    async fn generate(&self, request: &GenerateRequest) -> Result<Reply, AiError> {
        let backend = self.inner.lock().await;
        backend.generate(request).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
