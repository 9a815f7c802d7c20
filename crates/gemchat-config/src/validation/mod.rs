//! Full configuration validation.
//!
//! Each section is checked independently and every problem is collected
//! into a single `ConfigError`.

mod helpers;


use crate::schema::GemchatConfig;
use gemchat_common::ConfigError;

use helpers::{validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GemchatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_model(&mut errors, config);
    validate_exchange(&mut errors, config);
    validate_server(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_model(errors: &mut Vec<String>, config: &GemchatConfig) {
    let model = &config.model;

    if model.name.trim().is_empty() {
        errors.push("model.name must not be empty".into());
    }
    if !(model.api_base.starts_with("http://") || model.api_base.starts_with("https://")) {
        errors.push(format!(
            "model.api_base = {:?} must be an http(s) URL",
            model.api_base
        ));
    }
    if model.api_key_env.trim().is_empty() {
        errors.push("model.api_key_env must not be empty".into());
    }
    if let Some(temperature) = model.temperature {
        validate_range_f64(errors, "model.temperature", temperature, 0.0, 2.0);
    }
    if let Some(max) = model.max_output_tokens {
        if max == 0 {
            errors.push("model.max_output_tokens must be at least 1".into());
        }
    }
}

fn validate_exchange(errors: &mut Vec<String>, config: &GemchatConfig) {
    let exchange = &config.exchange;
    validate_range(errors, "exchange.timeout_secs", exchange.timeout_secs, 1, 3600);
    validate_range(
        errors,
        "exchange.connect_timeout_secs",
        exchange.connect_timeout_secs,
        1,
        300,
    );
}

fn validate_server(errors: &mut Vec<String>, config: &GemchatConfig) {
    if config.server.port == 0 {
        errors.push("server.port must not be 0".into());
    }
    if config.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".into());
    }
}
