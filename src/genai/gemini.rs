//! Gemini API client.
//!
//! Thin HTTP wrapper over `models/{m}:generateContent` (panel scripts and
//! continuation suggestions) and `models/{m}:predict` (Imagen artwork).
//! Prompt assembly and response parsing are pure functions for
//! testability; the script call constrains the model with a JSON response
//! schema so a malformed reply fails parsing instead of leaking through.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::config::GenConfig;
use super::types::{ComicGen, GenError, PanelScript};

// =============================================================================
// PROMPTS
// =============================================================================

const SCRIPT_SYSTEM: &str = "Você é um roteirista especialista em quadrinhos da Marvel dos anos 80. \
     Seu estilo é dramático, direto e cheio de ação. Crie roteiros curtos e \
     impactantes para painéis de HQs, sempre em português do Brasil.";

const SUGGEST_SYSTEM: &str =
    "Você é um roteirista de quadrinhos especialista em criar reviravoltas e momentos de alta tensão.";

/// Fixed art direction appended to every image prompt.
const IMAGE_STYLE_SUFFIX: &str = ", in the dynamic and gritty style of a 1980s Marvel comic book, \
     bold ink lines, vibrant but slightly aged color palette, ben-day dots, \
     action lines, dramatic lighting.";

/// Script prompt: continuation when there is story-so-far context,
/// first-panel otherwise.
#[must_use]
pub(crate) fn build_script_prompt(prompt: &str, context: &str) -> String {
    if context.is_empty() {
        format!("Crie o roteiro para o PRIMEIRO painel de uma HQ sobre: \"{prompt}\".")
    } else {
        format!(
            "CONTEXTO: A história até agora é sobre {context}. \
             ROTEIRO DO ÚLTIMO PAINEL: {prompt}. \
             Baseado nisso, crie o roteiro para o PRÓXIMO painel, continuando a ação."
        )
    }
}

#[must_use]
pub(crate) fn build_image_prompt(scene_description: &str) -> String {
    format!("{scene_description}{IMAGE_STYLE_SUFFIX}")
}

#[must_use]
pub(crate) fn build_suggest_prompt(context: &str) -> String {
    format!(
        "CONTEXTO DA HQ: {context}. \
         Baseado nisso, sugira uma continuação ou um final surpreendente em UMA \
         frase curta e impactante para o próximo painel. Seja criativo e no \
         estilo Marvel anos 80."
    )
}

/// JSON response schema enforced on the script call. Field names here are
/// the wire names [`PanelScript`] deserializes.
fn script_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sceneDescription": {
                "type": "STRING",
                "description": "Uma descrição vívida da cena em português para o ilustrador, \
                                focando em ação, emoção e enquadramento."
            },
            "panelText": {
                "type": "STRING",
                "description": "O texto que aparecerá no painel em português. Pode ser um diálogo \
                                curto (use aspas) ou uma narração (use 'NARRAÇÃO:'). Máximo de 20 palavras."
            }
        },
        "required": ["sceneDescription", "panelText"]
    })
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    config: GenConfig,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the HTTP client fails to construct.
    pub fn new(config: GenConfig) -> Result<Self, GenError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| GenError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Build a client from environment variables. See [`GenConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, GenError> {
        Self::new(GenConfig::from_env()?)
    }

    /// Configured script model name.
    #[must_use]
    pub fn text_model(&self) -> &str {
        &self.config.text_model
    }

    async fn post(&self, url: &str, body: &serde_json::Value) -> Result<String, GenError> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GenError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(GenError::ApiResponse { status, body: text });
        }

        Ok(text)
    }

    async fn generate_content(
        &self,
        model: &str,
        system: &str,
        prompt: &str,
        schema: Option<serde_json::Value>,
    ) -> Result<String, GenError> {
        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": system }] },
        });
        if let Some(schema) = schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        let text = self.post(&url, &body).await?;
        extract_text(&text)
    }
}

#[async_trait::async_trait]
impl ComicGen for GeminiClient {
    async fn generate_script(&self, prompt: &str, context: &str) -> Result<PanelScript, GenError> {
        let full_prompt = build_script_prompt(prompt, context);
        let text = self
            .generate_content(&self.config.text_model, SCRIPT_SYSTEM, &full_prompt, Some(script_schema()))
            .await?;
        parse_script(&text)
    }

    async fn generate_image(&self, scene_description: &str) -> Result<String, GenError> {
        let url = format!("{}/models/{}:predict", self.config.base_url, self.config.image_model);
        let body = json!({
            "instances": [{ "prompt": build_image_prompt(scene_description) }],
            "parameters": { "sampleCount": 1, "aspectRatio": "1:1" },
        });

        let text = self.post(&url, &body).await?;
        parse_image_response(&text)
    }

    async fn suggest_continuation(&self, context: &str) -> Result<String, GenError> {
        let prompt = build_suggest_prompt(context);
        let text = self
            .generate_content(&self.config.suggest_model, SUGGEST_SYSTEM, &prompt, None)
            .await?;
        Ok(text.trim().to_string())
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: String,
    #[serde(default)]
    mime_type: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Concatenated text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, GenError> {
    let api: GenerateContentResponse = serde_json::from_str(body).map_err(|e| GenError::ApiParse(e.to_string()))?;

    let Some(candidate) = api.candidates.into_iter().next() else {
        return Err(GenError::ApiParse("response has no candidates".into()));
    };

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect();
    Ok(text)
}

/// Parse the schema-constrained script JSON. A missing required field is a
/// parse failure.
fn parse_script(text: &str) -> Result<PanelScript, GenError> {
    serde_json::from_str(text.trim()).map_err(|e| GenError::ApiParse(e.to_string()))
}

/// First prediction as a `data:` URL; the base64 payload is embedded
/// without decoding.
fn parse_image_response(body: &str) -> Result<String, GenError> {
    let api: PredictResponse = serde_json::from_str(body).map_err(|e| GenError::ApiParse(e.to_string()))?;

    let Some(prediction) = api.predictions.into_iter().next() else {
        return Err(GenError::NoImage);
    };

    let mime = prediction.mime_type.as_deref().unwrap_or("image/jpeg");
    Ok(format!("data:{mime};base64,{}", prediction.bytes_base64_encoded))
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
