//! Generation gateway types — provider-neutral trait and errors.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by generation gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the model provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The image model returned zero images.
    #[error("no image was generated")]
    NoImage,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for GenError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::NoImage => "E_NO_IMAGE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// SCRIPT
// =============================================================================

/// Script for one panel as returned by the text model. Field names match
/// the JSON response schema sent with the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelScript {
    /// Vivid scene prose for the illustrator; becomes the panel's
    /// continuity context.
    pub scene_description: String,
    /// Short caption or dialogue line shown on the panel.
    pub panel_text: String,
}

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// Provider-neutral async trait for comic generation. Injected as a
/// capability handle so tests can substitute a fake gateway.
#[async_trait::async_trait]
pub trait ComicGen: Send + Sync {
    /// Produce the script for one panel from a user prompt and the
    /// story-so-far context (empty for the first panel).
    ///
    /// # Errors
    ///
    /// Returns a [`GenError`] if the request fails or the response is
    /// malformed (a missing required field is a parse failure).
    async fn generate_script(&self, prompt: &str, context: &str) -> Result<PanelScript, GenError>;

    /// Render one panel's artwork from its scene description. Returns a
    /// `data:` URL.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::NoImage`] when zero images come back, or a
    /// transport/parse error.
    async fn generate_image(&self, scene_description: &str) -> Result<String, GenError>;

    /// Suggest one short continuation sentence for the story so far.
    ///
    /// # Errors
    ///
    /// Returns a [`GenError`] analogously to [`ComicGen::generate_script`].
    async fn suggest_continuation(&self, context: &str) -> Result<String, GenError>;
}
