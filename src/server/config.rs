//! Backend configuration read from the environment (and `.env`, if present).

use std::env;

use crate::protocol::DEFAULT_PORT;

pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY environment variable not set. Check your .env file.")]
    MissingApiKey,
}

/// Primary and fallback model identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIds {
    pub primary: String,
    pub fallback: String,
}

impl Default for ModelIds {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback: DEFAULT_FALLBACK_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub api_base: String,
    pub models: ModelIds,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv::dotenv() {
            tracing::debug!(error = %err, "no .env file loaded");
        }

        let api_key = read_env_string("GEMINI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let models = ModelIds {
            primary: read_env_string("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_PRIMARY_MODEL.to_string()),
            fallback: read_env_string("GEMINI_FALLBACK_MODEL")
                .unwrap_or_else(|| DEFAULT_FALLBACK_MODEL.to_string()),
        };

        if models.primary == models.fallback {
            tracing::warn!(
                model = %models.primary,
                "fallback model is the same as the primary model"
            );
        }

        Ok(Self {
            api_key,
            api_base: read_env_string("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            models,
            port: read_env_u16("PORT", DEFAULT_PORT),
            request_timeout_secs: read_env_u64(
                "GEMINI_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
        })
    }
}

fn read_env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
