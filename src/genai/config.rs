//! Generation configuration parsed from environment variables.

use super::types::GenError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_SUGGEST_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    pub api_key: String,
    pub base_url: String,
    /// Model for panel scripts.
    pub text_model: String,
    /// Cheaper model for continuation suggestions.
    pub suggest_model: String,
    pub image_model: String,
    pub timeouts: GenTimeouts,
}

impl GenConfig {
    /// Build typed generation config from environment variables.
    ///
    /// Required:
    /// - `GEMINI_API_KEY`
    ///
    /// Optional:
    /// - `GEMINI_BASE_URL`: default Google Generative Language API
    /// - `GEMINI_TEXT_MODEL`: default "gemini-2.5-pro"
    /// - `GEMINI_SUGGEST_MODEL`: default "gemini-2.5-flash"
    /// - `GEMINI_IMAGE_MODEL`: default "imagen-4.0-generate-001"
    /// - `GENAI_REQUEST_TIMEOUT_SECS`: default 120
    /// - `GENAI_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if `GEMINI_API_KEY` is absent, or
    /// `ConfigParse` for a malformed timeout.
    pub fn from_env() -> Result<Self, GenError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Pure core of [`GenConfig::from_env`]: resolve every variable through
    /// `lookup`, so tests never mutate the process environment.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GenError> {
        let api_key = lookup("GEMINI_API_KEY").ok_or(GenError::MissingApiKey { var: "GEMINI_API_KEY".into() })?;

        let base_url = lookup("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let text_model = lookup("GEMINI_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string());
        let suggest_model = lookup("GEMINI_SUGGEST_MODEL").unwrap_or_else(|| DEFAULT_SUGGEST_MODEL.to_string());
        let image_model = lookup("GEMINI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());
        let timeouts = GenTimeouts {
            request_secs: parse_secs(&lookup, "GENAI_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs(&lookup, "GENAI_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_key, base_url, text_model, suggest_model, image_model, timeouts })
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64, GenError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    raw.parse::<u64>()
        .map_err(|_| GenError::ConfigParse(format!("{key}: expected seconds, got {raw:?}")))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
