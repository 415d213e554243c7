//! Strip routes — REST surface over the story and strip services.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::display::{self, PanelTextView};
use crate::error::ErrorCode;
use crate::services::story::{self, StoryError};
use crate::services::strip::{self, StripError};
use crate::state::{AppState, Panel};

// Fixed export literals; the browser embeds them into the PDF.
const EXPORT_TITLE: &str = "Gerador de HQs";
const EXPORT_FOOTER: &str = "Feito com o Gerador de HQs";
const EXPORT_FILE_NAME: &str = "minha-hq-epica.pdf";

// =============================================================================
// API ERROR
// =============================================================================

/// Error envelope crossing the API boundary: HTTP status plus a
/// `{code, message, retryable}` body the browser turns into a banner.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    retryable: bool,
}

impl ApiError {
    fn new(status: StatusCode, err: &(impl ErrorCode + ?Sized)) -> Self {
        Self { status, code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "code": self.code,
            "message": self.message,
            "retryable": self.retryable,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<StripError> for ApiError {
    fn from(err: StripError) -> Self {
        Self::new(strip_error_status(&err), &err)
    }
}

impl From<StoryError> for ApiError {
    fn from(err: StoryError) -> Self {
        Self::new(story_error_status(&err), &err)
    }
}

fn strip_error_status(err: &StripError) -> StatusCode {
    match err {
        StripError::NotFound(_) | StripError::PanelNotFound(_) => StatusCode::NOT_FOUND,
    }
}

fn story_error_status(err: &StoryError) -> StatusCode {
    match err {
        StoryError::GenNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        StoryError::BlankPrompt => StatusCode::BAD_REQUEST,
        StoryError::StripEmpty | StoryError::StripNotEmpty => StatusCode::CONFLICT,
        StoryError::Strip(e) => strip_error_status(e),
        StoryError::Gen(_) | StoryError::InvalidScript(_) => StatusCode::BAD_GATEWAY,
    }
}

// =============================================================================
// VIEW MODELS
// =============================================================================

#[derive(Serialize)]
pub struct PanelView {
    pub id: Uuid,
    pub image_url: String,
    pub panel_text: String,
    pub scene_description: String,
    /// Display-time interpretation of `panel_text` (narration vs dialogue).
    pub display: PanelTextView,
}

#[derive(Serialize)]
pub struct ExportView {
    pub title: &'static str,
    pub footer: &'static str,
    pub file_name: &'static str,
}

#[derive(Serialize)]
pub struct StripView {
    pub id: Uuid,
    pub rev: u64,
    pub panels: Vec<PanelView>,
    pub export: ExportView,
}

fn panel_view(panel: Panel) -> PanelView {
    let display = display::panel_text_view(&panel.panel_text);
    PanelView {
        id: panel.id,
        image_url: panel.image_url,
        panel_text: panel.panel_text,
        scene_description: panel.scene_description,
        display,
    }
}

fn strip_view(strip_id: Uuid, panels: Vec<Panel>, rev: u64) -> StripView {
    StripView {
        id: strip_id,
        rev,
        panels: panels.into_iter().map(panel_view).collect(),
        export: ExportView { title: EXPORT_TITLE, footer: EXPORT_FOOTER, file_name: EXPORT_FILE_NAME },
    }
}

async fn fresh_view(state: &AppState, strip_id: Uuid) -> Result<Json<StripView>, ApiError> {
    let (panels, rev) = strip::view(state, strip_id).await?;
    Ok(Json(strip_view(strip_id, panels, rev)))
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Deserialize)]
pub struct PromptBody {
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct EditTextBody {
    pub panel_text: String,
}

#[derive(Serialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/strips` — open a new session strip.
pub async fn create_strip(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let strip_id = strip::create_strip(&state).await;
    (StatusCode::CREATED, Json(json!({ "id": strip_id })))
}

/// `GET /api/strips/:id` — the full view model.
pub async fn get_strip(
    State(state): State<AppState>,
    Path(strip_id): Path<Uuid>,
) -> Result<Json<StripView>, ApiError> {
    fresh_view(&state, strip_id).await
}

/// `POST /api/strips/:id/panels` — generate the next panel: starts the
/// story on an empty strip, continues it otherwise (the browser only ever
/// offers one of the two forms at a time).
pub async fn generate_panel(
    State(state): State<AppState>,
    Path(strip_id): Path<Uuid>,
    Json(body): Json<PromptBody>,
) -> Result<Json<StripView>, ApiError> {
    let (panels, _) = strip::snapshot(&state, strip_id).await?;
    if panels.is_empty() {
        story::start_story(&state, strip_id, &body.prompt).await?;
    } else {
        story::continue_story(&state, strip_id, &body.prompt).await?;
    }
    fresh_view(&state, strip_id).await
}

/// `POST /api/strips/:id/panels/:panel_id/redo` — regenerate one panel in
/// place.
pub async fn redo_panel(
    State(state): State<AppState>,
    Path((strip_id, panel_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<PromptBody>,
) -> Result<Json<StripView>, ApiError> {
    story::redo_panel(&state, strip_id, panel_id, &body.prompt).await?;
    fresh_view(&state, strip_id).await
}

/// `PATCH /api/strips/:id/panels/:panel_id` — edit a caption in place.
/// Editing to the current value mutates nothing.
pub async fn edit_panel_text(
    State(state): State<AppState>,
    Path((strip_id, panel_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<EditTextBody>,
) -> Result<Json<StripView>, ApiError> {
    strip::edit_text(&state, strip_id, panel_id, &body.panel_text).await?;
    fresh_view(&state, strip_id).await
}

/// `POST /api/strips/:id/suggest` — one short continuation sentence for
/// the continuation input field.
pub async fn suggest(
    State(state): State<AppState>,
    Path(strip_id): Path<Uuid>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let suggestion = story::suggest_continuation(&state, strip_id).await?;
    Ok(Json(SuggestionResponse { suggestion }))
}

/// `DELETE /api/strips/:id/panels` — restart the story. The browser asks
/// for confirmation before calling this.
pub async fn restart(
    State(state): State<AppState>,
    Path(strip_id): Path<Uuid>,
) -> Result<Json<StripView>, ApiError> {
    strip::clear(&state, strip_id).await?;
    fresh_view(&state, strip_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::GenError;
    use crate::state::test_helpers;

    #[test]
    fn story_errors_map_to_statuses() {
        assert_eq!(story_error_status(&StoryError::BlankPrompt), StatusCode::BAD_REQUEST);
        assert_eq!(story_error_status(&StoryError::StripEmpty), StatusCode::CONFLICT);
        assert_eq!(story_error_status(&StoryError::StripNotEmpty), StatusCode::CONFLICT);
        assert_eq!(story_error_status(&StoryError::GenNotConfigured), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            story_error_status(&StoryError::Strip(StripError::PanelNotFound(Uuid::new_v4()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(story_error_status(&StoryError::Gen(GenError::NoImage)), StatusCode::BAD_GATEWAY);
        assert_eq!(
            story_error_status(&StoryError::InvalidScript("panelText")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn api_error_body_carries_code_and_retryable() {
        let err = ApiError::from(StoryError::Gen(GenError::ApiRequest("timeout".into())));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.code, "E_API_REQUEST");
        assert!(err.retryable);
        assert!(err.message.contains("timeout"));
    }

    #[test]
    fn strip_view_computes_display_without_touching_stored_text() {
        let narration = {
            let mut p = test_helpers::dummy_panel("cena");
            p.panel_text = "NARRAÇÃO: Enquanto isso...".into();
            p
        };
        let dialogue = {
            let mut p = test_helpers::dummy_panel("outra");
            p.panel_text = "\"Avante!\"".into();
            p
        };

        let view = strip_view(Uuid::new_v4(), vec![narration, dialogue], 7);
        assert_eq!(view.rev, 7);
        assert_eq!(view.panels[0].panel_text, "NARRAÇÃO: Enquanto isso...");
        assert_eq!(view.panels[0].display.text, "Enquanto isso...");
        assert_eq!(view.panels[1].panel_text, "\"Avante!\"");
        assert_eq!(view.panels[1].display.text, "Avante!");
        assert_eq!(view.export.title, EXPORT_TITLE);
        assert_eq!(view.export.file_name, EXPORT_FILE_NAME);
    }
}
