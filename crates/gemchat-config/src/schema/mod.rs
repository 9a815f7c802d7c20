//! Configuration schema types for Gemchat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod exchange;
mod logging;
mod model;
mod server;

pub use exchange::*;
pub use logging::*;
pub use model::*;
pub use server::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Gemchat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GemchatConfig {
    pub model: ModelConfig,
    pub exchange: ExchangeConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}
