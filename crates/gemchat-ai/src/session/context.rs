use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Caller-supplied cancellation signal and deadline for one exchange.
#[derive(Debug, Clone, Default)]
pub struct ExchangeContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl ExchangeContext {
    /// No deadline, never cancelled unless the token is triggered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
