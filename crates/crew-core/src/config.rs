//! Model and transport settings.

use serde::{Deserialize, Serialize};

use crate::error::{CrewError, Result};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Per-request model parameters, identical for every role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model version identifier sent with each request.
    pub model: String,
    /// Response length ceiling in tokens.
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ModelSettings {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Result<Self> {
        let settings = Self {
            model: model.into(),
            max_tokens,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(CrewError::Config("model identifier must not be empty".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(CrewError::Config("max_tokens must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Where and how to reach the Messages endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Value of the `anthropic-version` header.
    pub api_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Full URL of the message creation endpoint.
    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_the_relay_defaults() {
        let settings = ModelSettings::default();
        assert_eq!(settings.model, "claude-sonnet-4-20250514");
        assert_eq!(settings.max_tokens, 1500);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_max_tokens_is_rejected() {
        let err = ModelSettings::new("claude-x", 0).unwrap_err();
        assert!(matches!(err, CrewError::Config(_)));
    }

    #[test]
    fn test_blank_model_is_rejected() {
        assert!(ModelSettings::new("  ", 100).is_err());
    }

    #[test]
    fn test_messages_url_tolerates_trailing_slash() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/");
        assert_eq!(config.messages_url(), "http://localhost:8080/v1/messages");
    }
}
