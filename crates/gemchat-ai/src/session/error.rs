use std::time::Duration;

use crate::AiError;

/// Why an exchange produced no reply text.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The backend call itself failed. Never retried.
    #[error("backend error: {0}")]
    Backend(#[from] AiError),

    /// The backend answered, but without anything to read.
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    #[error("exchange cancelled")]
    Cancelled,

    #[error("exchange timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

impl ExchangeError {
    /// True when the caller (not the backend) ended the exchange.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ExchangeError::Cancelled | ExchangeError::TimedOut(_))
    }
}
