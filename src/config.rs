use std::env;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

const DEFAULT_LLM_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";
const MIN_API_KEY_LEN: usize = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub llm_api_base: String,
    pub llm_api_key: SecretString,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_attempts: u32,
    pub llm_retry_backoff_ms: u64,
    pub max_document_bytes: usize,
    pub telegram_token: Option<SecretString>,
    pub telegram_message_limit: usize,
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let llm_api_key = env::var("LLM_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .unwrap_or_default();

        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: parsed_or("WEB_SERVER_PORT", 8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            llm_api_base: env::var("LLM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_LLM_API_BASE.to_string()),
            llm_api_key: SecretString::from(llm_api_key),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            llm_timeout_secs: parsed_or("LLM_TIMEOUT_SECS", 120),
            llm_max_attempts: parsed_or("LLM_MAX_ATTEMPTS", 3),
            llm_retry_backoff_ms: parsed_or("LLM_RETRY_BACKOFF_MS", 500),
            max_document_bytes: parsed_or("MAX_DOCUMENT_BYTES", 20 * 1024 * 1024),
            telegram_token: env::var("TELEGRAM_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            telegram_message_limit: parsed_or("TELEGRAM_MESSAGE_LIMIT", 3500),
        }
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.llm_retry_backoff_ms)
    }

    /// Checks the settings every binary needs before it starts serving.
    pub fn validate(&self) -> AppResult<()> {
        let key = self.llm_api_key.expose_secret();

        if key.is_empty() {
            return Err(AppError::ValidationError(
                "LLM_API_KEY (or GEMINI_API_KEY) is not set".to_string(),
            ));
        }

        if key.len() < MIN_API_KEY_LEN {
            return Err(AppError::ValidationError(format!(
                "LLM_API_KEY is too short ({} characters); check for a placeholder value",
                key.len()
            )));
        }

        if self.llm_max_attempts == 0 {
            return Err(AppError::ValidationError(
                "LLM_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        if self.llm_timeout_secs == 0 || self.max_document_bytes == 0 || self.telegram_message_limit == 0 {
            return Err(AppError::ValidationError(
                "LLM_TIMEOUT_SECS, MAX_DOCUMENT_BYTES and TELEGRAM_MESSAGE_LIMIT must be non-zero"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// The bot binary cannot run without a token.
    pub fn require_telegram_token(&self) -> AppResult<&SecretString> {
        self.telegram_token
            .as_ref()
            .ok_or_else(|| AppError::ValidationError("TELEGRAM_TOKEN is not set".to_string()))
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            llm_api_base: "http://localhost:9999/v1".to_string(),
            llm_api_key: SecretString::from("test-key-test-key-test-key-test-key".to_string()),
            llm_model: "test-model".to_string(),
            llm_timeout_secs: 5,
            llm_max_attempts: 3,
            llm_retry_backoff_ms: 0,
            max_document_bytes: 1024 * 1024,
            telegram_token: None,
            telegram_message_limit: 3500,
        }
    }
}
