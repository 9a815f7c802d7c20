//! HTTP surface: landing page plus a JSON chat endpoint over one shared
//! `Session`.

mod error;
mod handlers;
mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use gemchat_ai::Session;
use gemchat_common::GemchatError;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub use handlers::create_router;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    /// Deadline for each `/chat` exchange.
    pub exchange_timeout: Duration,
    /// Cancelled on shutdown; aborts in-flight exchanges.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(session: Session, exchange_timeout: Duration) -> Self {
        Self {
            session: Arc::new(session),
            exchange_timeout,
            shutdown: CancellationToken::new(),
        }
    }
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: &str) -> Result<(), GemchatError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| GemchatError::Server(format!("failed to bind {addr}: {e}")))?;

    let trigger = state.shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = crate::signal::interrupted() => info!("shutdown requested"),
            _ = trigger.cancelled() => {}
        }
        trigger.cancel();
    });

    serve_on(listener, state).await
}

/// Serve on an already-bound listener until `state.shutdown` is cancelled.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), GemchatError> {
    let shutdown = state.shutdown.clone();
    info!(
        model = %state.session.model(),
        "gemchat listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("server stopped");
    Ok(())
}
