//! Story service — panel continuity and redo.
//!
//! DESIGN
//! ======
//! The controller decides what the generative model gets to see for each
//! user action. Starting a story sends the idea alone; continuing sends
//! the whole story-so-far as compressed context plus the last scene
//! spliced with the new directive; redoing a panel sends only the scenes
//! strictly before it, so a regenerated panel is never influenced by
//! scenes that narratively have not happened yet relative to its slot.
//!
//! Planning is pure (`plan_*` return a [`PanelPlan`]); execution snapshots
//! the strip, runs the two-step generation, and merges the result through
//! `strip::apply`, which discards late arrivals after a restart.

use tracing::{info, warn};
use uuid::Uuid;

use crate::display;
use crate::genai::{ComicGen, GenError, PanelScript};
use crate::services::strip::{self, Applied, Merge, StripError};
use crate::state::{AppState, Panel, PanelContent};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("generation client not configured")]
    GenNotConfigured,
    #[error("prompt must not be blank")]
    BlankPrompt,
    #[error("the strip has no panels yet")]
    StripEmpty,
    #[error("the strip already has panels")]
    StripNotEmpty,
    #[error("strip error: {0}")]
    Strip(#[from] StripError),
    #[error("generation failed: {0}")]
    Gen(#[from] GenError),
    #[error("generated script is missing {0}")]
    InvalidScript(&'static str),
}

impl crate::error::ErrorCode for StoryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::GenNotConfigured => "E_GEN_NOT_CONFIGURED",
            Self::BlankPrompt => "E_BLANK_PROMPT",
            Self::StripEmpty => "E_STRIP_EMPTY",
            Self::StripNotEmpty => "E_STRIP_NOT_EMPTY",
            Self::Strip(e) => e.error_code(),
            Self::Gen(e) => e.error_code(),
            Self::InvalidScript(_) => "E_INVALID_SCRIPT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Gen(e) if e.retryable())
    }
}

/// The exact (context, prompt) pair for one generation, plus where the
/// result lands. Computed by the pure `plan_*` functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelPlan {
    pub context: String,
    pub prompt: String,
    pub merge: Merge,
}

// =============================================================================
// PLANNING
// =============================================================================

/// Story-so-far context: every scene description in order, joined by a
/// single space. Deliberately lossy.
#[must_use]
pub fn join_scenes(panels: &[Panel]) -> String {
    panels
        .iter()
        .map(|p| p.scene_description.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First panel: no context, the user's idea verbatim.
///
/// # Errors
///
/// `BlankPrompt` on blank input, `StripNotEmpty` if panels already exist.
pub fn plan_start(panels: &[Panel], prompt: &str) -> Result<PanelPlan, StoryError> {
    if prompt.trim().is_empty() {
        return Err(StoryError::BlankPrompt);
    }
    if !panels.is_empty() {
        return Err(StoryError::StripNotEmpty);
    }
    Ok(PanelPlan { context: String::new(), prompt: prompt.to_string(), merge: Merge::Append })
}

/// Next panel: full story context, and the last scene spliced with the
/// user's new directive so the model sees both.
///
/// # Errors
///
/// `BlankPrompt` on blank input, `StripEmpty` if there is nothing to
/// continue.
pub fn plan_continuation(panels: &[Panel], prompt: &str) -> Result<PanelPlan, StoryError> {
    if prompt.trim().is_empty() {
        return Err(StoryError::BlankPrompt);
    }
    let Some(last) = panels.last() else {
        return Err(StoryError::StripEmpty);
    };
    Ok(PanelPlan {
        context: join_scenes(panels),
        prompt: format!("{}. User added: \"{prompt}\"", last.scene_description),
        merge: Merge::Append,
    })
}

/// Regenerate one panel in place: context is only the scenes strictly
/// before its position, and the user's prompt goes through verbatim.
///
/// # Errors
///
/// `BlankPrompt` on blank input, `PanelNotFound` for an unknown id.
pub fn plan_redo(panels: &[Panel], panel_id: Uuid, prompt: &str) -> Result<PanelPlan, StoryError> {
    if prompt.trim().is_empty() {
        return Err(StoryError::BlankPrompt);
    }
    let index = panels
        .iter()
        .position(|p| p.id == panel_id)
        .ok_or(StripError::PanelNotFound(panel_id))?;
    Ok(PanelPlan {
        context: join_scenes(&panels[..index]),
        prompt: prompt.to_string(),
        merge: Merge::Replace(panel_id),
    })
}

// =============================================================================
// GENERATION
// =============================================================================

fn gateway(state: &AppState) -> Result<&dyn ComicGen, StoryError> {
    state
        .genai
        .as_deref()
        .ok_or(StoryError::GenNotConfigured)
}

fn validate_script(script: &PanelScript) -> Result<(), StoryError> {
    if script.scene_description.trim().is_empty() {
        return Err(StoryError::InvalidScript("sceneDescription"));
    }
    if script.panel_text.trim().is_empty() {
        return Err(StoryError::InvalidScript("panelText"));
    }
    Ok(())
}

/// Shared two-step generation: script first, then artwork from the
/// script's scene. Sequential — the image call depends on the script.
async fn generate_panel(genai: &dyn ComicGen, plan: &PanelPlan) -> Result<PanelContent, StoryError> {
    let script = genai.generate_script(&plan.prompt, &plan.context).await?;
    validate_script(&script)?;

    let image_url = genai.generate_image(&script.scene_description).await?;

    Ok(PanelContent {
        image_url,
        panel_text: script.panel_text,
        scene_description: script.scene_description,
    })
}

async fn run_plan(state: &AppState, strip_id: Uuid, epoch: u64, plan: PanelPlan) -> Result<Applied, StoryError> {
    let content = generate_panel(gateway(state)?, &plan).await?;
    let applied = strip::apply(state, strip_id, epoch, plan.merge, content).await?;
    if applied == Applied::Discarded {
        warn!(%strip_id, "story: result arrived after restart — discarded");
    }
    Ok(applied)
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Generate the first panel of an empty strip.
///
/// # Errors
///
/// Planning, gateway, and store errors; blank input never reaches the
/// gateway.
pub async fn start_story(state: &AppState, strip_id: Uuid, prompt: &str) -> Result<Applied, StoryError> {
    let (panels, epoch) = strip::snapshot(state, strip_id).await?;
    let plan = plan_start(&panels, prompt)?;
    info!(%strip_id, prompt_len = prompt.len(), "story: start");
    run_plan(state, strip_id, epoch, plan).await
}

/// Generate the next panel of a non-empty strip.
///
/// # Errors
///
/// Planning, gateway, and store errors; blank input never reaches the
/// gateway.
pub async fn continue_story(state: &AppState, strip_id: Uuid, prompt: &str) -> Result<Applied, StoryError> {
    let (panels, epoch) = strip::snapshot(state, strip_id).await?;
    let plan = plan_continuation(&panels, prompt)?;
    info!(%strip_id, panel_count = panels.len(), "story: continue");
    run_plan(state, strip_id, epoch, plan).await
}

/// Regenerate one existing panel in place, preserving id and position.
///
/// # Errors
///
/// Planning, gateway, and store errors; blank input never reaches the
/// gateway.
pub async fn redo_panel(state: &AppState, strip_id: Uuid, panel_id: Uuid, prompt: &str) -> Result<Applied, StoryError> {
    let (panels, epoch) = strip::snapshot(state, strip_id).await?;
    let plan = plan_redo(&panels, panel_id, prompt)?;
    info!(%strip_id, %panel_id, "story: redo");
    run_plan(state, strip_id, epoch, plan).await
}

/// One short continuation sentence for the story so far, quote-stripped
/// and trimmed. Populates the continuation input; never submits it.
///
/// # Errors
///
/// `StripEmpty` on an empty strip; gateway errors surface whole.
pub async fn suggest_continuation(state: &AppState, strip_id: Uuid) -> Result<String, StoryError> {
    let (panels, _) = strip::snapshot(state, strip_id).await?;
    if panels.is_empty() {
        return Err(StoryError::StripEmpty);
    }

    let context = join_scenes(&panels);
    info!(%strip_id, panel_count = panels.len(), "story: suggest");
    let raw = gateway(state)?.suggest_continuation(&context).await?;
    Ok(display::strip_quotes(raw.trim()))
}

#[cfg(test)]
#[path = "story_test.rs"]
mod tests;
