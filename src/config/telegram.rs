//! Telegram Bot API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Telegram configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather, `<id>:<secret>`
    pub bot_token: Secret<String>,

    /// Bot API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Long-poll timeout in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl TelegramConfig {
    /// Get the long-poll timeout as Duration
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let token = self.bot_token.expose_secret();
        if token.is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
        }
        if !looks_like_bot_token(token) {
            return Err(ValidationError::InvalidBotToken);
        }
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 50 {
            return Err(ValidationError::InvalidTimeout("telegram poll timeout"));
        }
        Ok(())
    }
}

/// `<numeric bot id>:<secret>`.
fn looks_like_bot_token(token: &str) -> bool {
    match token.split_once(':') {
        Some((id, secret)) => {
            !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) && !secret.is_empty()
        }
        None => false,
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: Secret::new(token.to_string()),
            api_base: default_api_base(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }

    #[test]
    fn test_valid_token() {
        assert!(config("123456:ABC-def").validate().is_ok());
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(
            config("").validate(),
            Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"))
        );
    }

    #[test]
    fn test_malformed_token() {
        for token in ["abc:def", "123456", ":abc", "123:"] {
            let result = config(token).validate();
            assert_eq!(result, Err(ValidationError::InvalidBotToken), "{token}");
        }
    }

    #[test]
    fn test_poll_timeout_bounds() {
        let mut config = config("1:a");
        config.poll_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.poll_timeout_secs = 25;
        assert_eq!(config.poll_timeout(), Duration::from_secs(25));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", config("123456:super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
