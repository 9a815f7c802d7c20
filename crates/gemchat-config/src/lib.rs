//! Gemchat configuration system.
//!
//! TOML-based configuration for the model backend, the exchange deadline,
//! the HTTP surface and logging. Every section uses serde defaults so a
//! partial (or absent) config file works out of the box. The API key is
//! never stored in the file; it is read from the environment variable the
//! config names.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gemchat_config::{load_config, resolve_api_key};
//!
//! let config = load_config(None).expect("failed to load config");
//! let key = resolve_api_key(&config.model).expect("GEMINI_API_KEY not set");
//! ```

pub mod credentials;
pub mod dotenv;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::resolve_api_key;
pub use schema::{ExchangeConfig, GemchatConfig, LoggingConfig, ModelConfig, ServerConfig};

use std::path::Path;

use gemchat_common::ConfigError;

/// Load and validate the config.
///
/// With an explicit `path` the file must exist; otherwise the platform
/// default location is used and created with a commented template on first
/// run.
pub fn load_config(path: Option<&Path>) -> Result<GemchatConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}
