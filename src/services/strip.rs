//! Strip service — the panel sequence store.
//!
//! DESIGN
//! ======
//! Owns panel identity and ordering. Append adds at the end with a fresh
//! id; replace overwrites one panel's content in place while preserving
//! its id and position; text edits touch only `panel_text` and are no-ops
//! when the value is unchanged. `rev` counts real mutations, `epoch`
//! counts restarts. `apply` is the controller's entry point: it compares
//! the epoch captured when the generation started and discards results
//! that resolve after a restart instead of resurrecting cleared panels.

use uuid::Uuid;

use crate::state::{AppState, Panel, PanelContent, StripState};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StripError {
    #[error("strip not found: {0}")]
    NotFound(Uuid),
    #[error("panel not found: {0}")]
    PanelNotFound(Uuid),
}

impl crate::error::ErrorCode for StripError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_STRIP_NOT_FOUND",
            Self::PanelNotFound(_) => "E_PANEL_NOT_FOUND",
        }
    }
}

/// Where a generated panel lands in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// New panel at the end.
    Append,
    /// Overwrite the panel with this id, keeping its id and position.
    Replace(Uuid),
}

/// Outcome of an epoch-checked apply.
#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    Panel(Panel),
    /// The strip was restarted while the generation was in flight; the
    /// result was dropped without mutating anything.
    Discarded,
}

/// Outcome of a text edit.
#[derive(Debug, PartialEq, Eq)]
pub enum Edit {
    Changed(Panel),
    /// The new text equals the current text; nothing was mutated.
    Unchanged,
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Create an empty strip and return its id.
pub async fn create_strip(state: &AppState) -> Uuid {
    let strip_id = Uuid::new_v4();
    let mut strips = state.strips.write().await;
    strips.insert(strip_id, StripState::new());
    strip_id
}

/// Snapshot a strip's panels and current epoch. Generation operations
/// plan against this snapshot and hand the epoch back to [`apply`].
///
/// # Errors
///
/// Returns `NotFound` for an unknown strip id.
pub async fn snapshot(state: &AppState, strip_id: Uuid) -> Result<(Vec<Panel>, u64), StripError> {
    let strips = state.strips.read().await;
    let strip = strips.get(&strip_id).ok_or(StripError::NotFound(strip_id))?;
    Ok((strip.panels.clone(), strip.epoch))
}

/// Panels plus the mutation counter, for view serialization.
///
/// # Errors
///
/// Returns `NotFound` for an unknown strip id.
pub async fn view(state: &AppState, strip_id: Uuid) -> Result<(Vec<Panel>, u64), StripError> {
    let strips = state.strips.read().await;
    let strip = strips.get(&strip_id).ok_or(StripError::NotFound(strip_id))?;
    Ok((strip.panels.clone(), strip.rev))
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Append a new panel at the end of the sequence.
///
/// # Errors
///
/// Returns `NotFound` for an unknown strip id.
pub async fn append(state: &AppState, strip_id: Uuid, content: PanelContent) -> Result<Panel, StripError> {
    let mut strips = state.strips.write().await;
    let strip = strips
        .get_mut(&strip_id)
        .ok_or(StripError::NotFound(strip_id))?;
    Ok(append_locked(strip, content))
}

/// Replace one panel's content in place. Id and position are preserved.
///
/// # Errors
///
/// Returns `NotFound` / `PanelNotFound` for unknown ids.
pub async fn replace_at(
    state: &AppState,
    strip_id: Uuid,
    panel_id: Uuid,
    content: PanelContent,
) -> Result<Panel, StripError> {
    let mut strips = state.strips.write().await;
    let strip = strips
        .get_mut(&strip_id)
        .ok_or(StripError::NotFound(strip_id))?;
    replace_locked(strip, panel_id, content)
}

/// Epoch-checked merge of a generation result, used by the controller.
/// Returns [`Applied::Discarded`] without mutating when the strip was
/// restarted after `epoch` was captured.
///
/// # Errors
///
/// Returns `NotFound` / `PanelNotFound` for unknown ids.
pub async fn apply(
    state: &AppState,
    strip_id: Uuid,
    epoch: u64,
    merge: Merge,
    content: PanelContent,
) -> Result<Applied, StripError> {
    let mut strips = state.strips.write().await;
    let strip = strips
        .get_mut(&strip_id)
        .ok_or(StripError::NotFound(strip_id))?;

    if strip.epoch != epoch {
        return Ok(Applied::Discarded);
    }

    match merge {
        Merge::Append => Ok(Applied::Panel(append_locked(strip, content))),
        Merge::Replace(panel_id) => Ok(Applied::Panel(replace_locked(strip, panel_id, content)?)),
    }
}

/// Overwrite one panel's caption. Editing to the current value is a no-op:
/// nothing is mutated and `rev` does not move.
///
/// # Errors
///
/// Returns `NotFound` / `PanelNotFound` for unknown ids.
pub async fn edit_text(
    state: &AppState,
    strip_id: Uuid,
    panel_id: Uuid,
    new_text: &str,
) -> Result<Edit, StripError> {
    let mut strips = state.strips.write().await;
    let strip = strips
        .get_mut(&strip_id)
        .ok_or(StripError::NotFound(strip_id))?;
    let panel = strip
        .panels
        .iter_mut()
        .find(|p| p.id == panel_id)
        .ok_or(StripError::PanelNotFound(panel_id))?;

    if panel.panel_text == new_text {
        return Ok(Edit::Unchanged);
    }

    panel.panel_text = new_text.to_string();
    let panel = panel.clone();
    strip.rev += 1;
    Ok(Edit::Changed(panel))
}

/// Restart: drop every panel and bump the epoch so in-flight generation
/// results are discarded on arrival.
///
/// # Errors
///
/// Returns `NotFound` for an unknown strip id.
pub async fn clear(state: &AppState, strip_id: Uuid) -> Result<(), StripError> {
    let mut strips = state.strips.write().await;
    let strip = strips
        .get_mut(&strip_id)
        .ok_or(StripError::NotFound(strip_id))?;
    strip.panels.clear();
    strip.rev += 1;
    strip.epoch += 1;
    Ok(())
}

fn append_locked(strip: &mut StripState, content: PanelContent) -> Panel {
    let panel = Panel::new(content);
    strip.panels.push(panel.clone());
    strip.rev += 1;
    panel
}

fn replace_locked(strip: &mut StripState, panel_id: Uuid, content: PanelContent) -> Result<Panel, StripError> {
    let panel = strip
        .panels
        .iter_mut()
        .find(|p| p.id == panel_id)
        .ok_or(StripError::PanelNotFound(panel_id))?;

    panel.image_url = content.image_url;
    panel.panel_text = content.panel_text;
    panel.scene_description = content.scene_description;
    let panel = panel.clone();
    strip.rev += 1;
    Ok(panel)
}

#[cfg(test)]
#[path = "strip_test.rs"]
mod tests;
