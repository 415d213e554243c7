//! Display-time interpretation of panel text.
//!
//! A caption starting with the narration marker renders as a narrator box
//! with the marker stripped; anything else renders as a speech bubble with
//! quote characters removed. The stored `panel_text` is never mutated —
//! this is a view transform computed while serializing the strip.

use serde::Serialize;

/// Fixed marker recognized case-insensitively at the start of a caption.
pub const NARRATION_MARKER: &str = "NARRAÇÃO:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    Narration,
    Dialogue,
}

/// How one panel's caption should be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelTextView {
    pub kind: TextKind,
    pub text: String,
}

/// Compute the display form of a stored caption.
#[must_use]
pub fn panel_text_view(panel_text: &str) -> PanelTextView {
    if panel_text.to_uppercase().starts_with(NARRATION_MARKER) {
        let marker_chars = NARRATION_MARKER.chars().count();
        let rest: String = panel_text.chars().skip(marker_chars).collect();
        PanelTextView { kind: TextKind::Narration, text: rest.trim().to_string() }
    } else {
        PanelTextView { kind: TextKind::Dialogue, text: strip_quotes(panel_text) }
    }
}

/// Remove every single and double quote character.
#[must_use]
pub fn strip_quotes(text: &str) -> String {
    text.replace(['\'', '"'], "")
}
