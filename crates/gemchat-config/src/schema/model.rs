use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Which model to talk to and how to reach it.
///
/// The model is fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier, e.g. `gemini-1.5-flash`.
    pub name: String,
    /// Base URL of the models endpoint (without the model segment).
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Upper bound on generated tokens. Backend default when unset.
    pub max_output_tokens: Option<u32>,
    /// Sampling temperature (0.0-2.0). Backend default when unset.
    pub temperature: Option<f64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.into(),
            api_base: DEFAULT_API_BASE.into(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            max_output_tokens: None,
            temperature: None,
        }
    }
}
