use std::path::PathBuf;

use serde::Deserialize;
use styrene_chat::{DEFAULT_DEVELOPER_PROMPT, DEFAULT_MODEL, is_supported_model};

use crate::error::StyError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const API_KEY_PREFIX: &str = "sk-";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub developer_prompt: Option<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("styrene").join("config.toml"))
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };

    toml::from_str(&content).unwrap_or_default()
}

/// Credential format rule: non-empty and carrying the issuer prefix.
/// Rejection happens before any network call.
pub fn validate_api_key(key: &str) -> Result<(), StyError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(StyError::EmptyApiKey);
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(StyError::MalformedApiKey);
    }
    Ok(())
}

/// Chat settings after CLI > config file > default precedence.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Prefills the credential gate; still validated and probed there.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub developer_prompt: String,
}

pub fn resolve_chat_options(
    cli_base_url: Option<String>,
    cli_model: Option<String>,
    cli_prompt: Option<String>,
) -> Result<ChatOptions, StyError> {
    let config = load_config();

    let model = cli_model
        .or(config.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if !is_supported_model(&model) {
        return Err(StyError::UnknownModel(model));
    }

    // Environment variable wins over the config file.
    let api_key = std::env::var("STYRENE_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .or(config.api_key)
        .filter(|k| !k.is_empty());

    Ok(ChatOptions {
        api_key,
        base_url: cli_base_url
            .or(config.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        model,
        developer_prompt: cli_prompt
            .or(config.developer_prompt)
            .unwrap_or_else(|| DEFAULT_DEVELOPER_PROMPT.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(validate_api_key(""), Err(StyError::EmptyApiKey)));
        assert!(matches!(
            validate_api_key("   "),
            Err(StyError::EmptyApiKey)
        ));
    }

    #[test]
    fn unprefixed_key_is_rejected() {
        assert!(matches!(
            validate_api_key("abc123"),
            Err(StyError::MalformedApiKey)
        ));
    }

    #[test]
    fn prefixed_key_is_accepted() {
        assert!(validate_api_key("sk-proj-abc123").is_ok());
        assert!(validate_api_key("  sk-abc123  ").is_ok());
    }
}
