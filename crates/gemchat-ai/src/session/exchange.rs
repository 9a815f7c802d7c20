//! Session struct and the exchange operation.

use std::sync::Arc;

use tracing::debug;

use crate::reply::{GenerateRequest, Reply};
use crate::GenerativeBackend;

use super::context::ExchangeContext;
use super::error::ExchangeError;
use super::flatten::flatten_reply;

/// A long-lived handle to one configured model.
///
/// Holds no conversational state, so `&Session` can be shared by any number
/// of concurrent callers. Dropping the last handle releases the backend.
#[derive(Clone)]
pub struct Session {
    backend: Arc<dyn GenerativeBackend>,
}

impl Session {
    pub fn new(backend: impl GenerativeBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_shared(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Send `input` as a single-turn request and return the raw reply.
    ///
    /// Races the backend call against the context's cancellation token and
    /// deadline; whichever loses is dropped. An already-cancelled context
    /// returns without contacting the backend.
    pub async fn send(&self, ctx: &ExchangeContext, input: &str) -> Result<Reply, ExchangeError> {
        let request = GenerateRequest::from_text(input);
        debug!(model = %self.model(), input_len = input.len(), "exchange started");

        let call = async {
            match ctx.timeout() {
                Some(limit) => {
                    match tokio::time::timeout(limit, self.backend.generate(&request)).await {
                        Ok(result) => result.map_err(ExchangeError::from),
                        Err(_) => Err(ExchangeError::TimedOut(limit)),
                    }
                }
                None => self
                    .backend
                    .generate(&request)
                    .await
                    .map_err(ExchangeError::from),
            }
        };

        let reply = tokio::select! {
            biased;
            _ = ctx.cancel_token().cancelled() => Err(ExchangeError::Cancelled),
            result = call => result,
        }?;

        debug!(
            model = %self.model(),
            candidates = reply.candidates.len(),
            "exchange finished"
        );
        Ok(reply)
    }

    /// Send `input` and flatten the reply to display text.
    pub async fn exchange(
        &self,
        ctx: &ExchangeContext,
        input: &str,
    ) -> Result<String, ExchangeError> {
        let reply = self.send(ctx, input).await?;
        flatten_reply(&reply)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("model", &self.model())
            .finish()
    }
}
