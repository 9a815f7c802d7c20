//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Gemchat Configuration
# Only override what you want to change -- missing fields use defaults.

[model]
# name = "gemini-1.5-flash"
# api_base = "https://generativelanguage.googleapis.com/v1beta/models"
# api_key_env = "GEMINI_API_KEY"   # the key itself is never stored here
# max_output_tokens = 2048         # >= 1, backend default when unset
# temperature = 0.7                # 0.0-2.0, backend default when unset

[exchange]
# timeout_secs = 120               # 1-3600
# connect_timeout_secs = 10        # 1-300

[server]
# host = "0.0.0.0"
# port = 8080

[logging]
# level = "info"                   # overridden by RUST_LOG and --log-level
"##
}
