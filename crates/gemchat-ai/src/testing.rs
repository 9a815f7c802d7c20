//! Scripted in-process backend for tests.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for downstream crates' tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::reply::{GenerateRequest, Reply};
use crate::{AiError, GenerativeBackend};

/// Replays queued outcomes in order and records every request it sees.
///
/// Once the queue is drained every further call fails with an `ApiError`.
pub struct ScriptedBackend {
    model: String,
    outcomes: Mutex<VecDeque<Result<Reply, AiError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            model: "scripted-model".to_string(),
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_reply(self, reply: Reply) -> Self {
        lock(&self.outcomes).push_back(Ok(reply));
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_reply(Reply::from_text(text))
    }

    pub fn with_error(self, error: AiError) -> Self {
        lock(&self.outcomes).push_back(Err(error));
        self
    }

    /// Sleep this long inside every call before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Highest number of calls observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<Reply, AiError> {
        lock(&self.requests).push(request.clone());
        let _flight = FlightGuard::enter(self);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = lock(&self.outcomes).pop_front();
        outcome.unwrap_or_else(|| Err(AiError::ApiError("no scripted reply left".into())))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Tracks concurrent calls; released on drop so cancelled calls count out.
struct FlightGuard<'a> {
    backend: &'a ScriptedBackend,
}

impl<'a> FlightGuard<'a> {
    fn enter(backend: &'a ScriptedBackend) -> Self {
        let now = backend.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        backend.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self { backend }
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.backend.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
