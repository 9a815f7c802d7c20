//! Process startup: environment, logging and session construction.

use std::path::Path;
use std::time::Duration;

use gemchat_ai::{GeminiClient, GeminiConfig, Session};
use gemchat_common::ConfigError;
use gemchat_config::GemchatConfig;
use tracing_subscriber::EnvFilter;

const FALLBACK_DIRECTIVE: &str = "info";

/// Slack added to the HTTP client timeout so the exchange deadline always
/// fires first and expiry is reported as `ExchangeError::TimedOut`.
const TRANSPORT_GRACE: Duration = Duration::from_secs(5);

/// Load `.env` from the working directory before anything reads the
/// environment.
pub fn load_dotenv() {
    gemchat_config::dotenv::load(Path::new(".env"));
}

/// Pick the log filter: `--log-level`, then config, then `info`.
///
/// `RUST_LOG` still wins over all of these in [`init_logging`].
pub fn log_directive(cli: Option<&str>, config: Option<&GemchatConfig>) -> String {
    cli.map(str::to_string)
        .or_else(|| config.map(|c| c.logging.level.clone()))
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_DIRECTIVE.to_string())
}

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for replies.
pub fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Translate the model section into a client config around `api_key`.
pub fn gemini_config(config: &GemchatConfig, api_key: String) -> GeminiConfig {
    GeminiConfig::new(api_key)
        .with_model(config.model.name.clone())
        .with_api_base(config.model.api_base.clone())
        .with_max_tokens(config.model.max_output_tokens)
        .with_temperature(config.model.temperature)
        .with_timeouts(
            config.exchange.connect_timeout(),
            config.exchange.timeout() + TRANSPORT_GRACE,
        )
}

/// Resolve the credential and open the session.
pub fn build_session(config: &GemchatConfig) -> Result<Session, ConfigError> {
    let api_key = gemchat_config::resolve_api_key(&config.model)?;
    let client = GeminiClient::new(gemini_config(config, api_key))?;
    Ok(Session::new(client))
}
