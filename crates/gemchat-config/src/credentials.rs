//! API key resolution from the process environment.

use gemchat_common::ConfigError;

use crate::schema::ModelConfig;

/// Read the API key from the environment variable named by the config.
///
/// A set-but-blank variable counts as missing.
pub fn resolve_api_key(model: &ModelConfig) -> Result<String, ConfigError> {
    lookup_api_key(model, |name| std::env::var(name).ok())
}

pub(crate) fn lookup_api_key(
    model: &ModelConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    match lookup(&model.api_key_env) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingCredential(model.api_key_env.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_key_is_returned_trimmed() {
        let model = ModelConfig::default();
        let key = lookup_api_key(&model, |name| {
            assert_eq!(name, "GEMINI_API_KEY");
            Some(" abc123\n".into())
        })
        .unwrap();
        assert_eq!(key, "abc123");
    }

    #[test]
    fn absent_key_is_missing_credential() {
        let model = ModelConfig::default();
        let err = lookup_api_key(&model, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ref v) if v == "GEMINI_API_KEY"));
    }

    #[test]
    fn blank_key_is_missing_credential() {
        let model = ModelConfig {
            api_key_env: "OTHER_KEY".into(),
            ..ModelConfig::default()
        };
        let err = lookup_api_key(&model, |_| Some("   ".into())).unwrap_err();
        assert!(err.to_string().contains("OTHER_KEY"));
    }
}
