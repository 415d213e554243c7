//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds a map of live strips and the optional generation client.
//! Each strip is one browser session's comic: an ordered panel list plus
//! two counters — `rev` (bumped on every real mutation, so a no-op text
//! edit is observable as a no-op) and `epoch` (bumped only on restart,
//! used to discard generation results that resolve after a restart).

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::genai::ComicGen;

// =============================================================================
// PANEL
// =============================================================================

/// One frame of the comic strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub id: Uuid,
    /// `data:` URL of the rendered artwork.
    pub image_url: String,
    /// User-visible caption or dialogue line. Editable in place.
    pub panel_text: String,
    /// Generation-facing prose for this panel; doubles as continuity
    /// context for later panels. Only a full redo replaces it.
    pub scene_description: String,
}

/// Generated panel payload before identity assignment. `append` mints a
/// fresh id for it; `replace` grafts it under the existing id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelContent {
    pub image_url: String,
    pub panel_text: String,
    pub scene_description: String,
}

impl Panel {
    #[must_use]
    pub fn new(content: PanelContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_url: content.image_url,
            panel_text: content.panel_text,
            scene_description: content.scene_description,
        }
    }
}

// =============================================================================
// STRIP STATE
// =============================================================================

/// Per-session live state. In-memory only; dies with the process.
pub struct StripState {
    /// Panels in display order. Index = display position = generation order.
    pub panels: Vec<Panel>,
    /// Mutation counter. Unchanged by no-op edits.
    pub rev: u64,
    /// Restart counter. A generation result carrying an older epoch is
    /// discarded instead of applied.
    pub epoch: u64,
}

impl StripState {
    #[must_use]
    pub fn new() -> Self {
        Self { panels: Vec::new(), rev: 0, epoch: 0 }
    }
}

impl Default for StripState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub strips: Arc<RwLock<HashMap<Uuid, StripState>>>,
    /// Optional generation client. `None` if `GEMINI_API_KEY` is not set.
    pub genai: Option<Arc<dyn ComicGen>>,
}

impl AppState {
    #[must_use]
    pub fn new(genai: Option<Arc<dyn ComicGen>>) -> Self {
        Self { strips: Arc::new(RwLock::new(HashMap::new())), genai }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
