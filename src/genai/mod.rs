//! Generation gateway — script, artwork, and suggestion capabilities.
//!
//! DESIGN
//! ======
//! The controller only sees the [`ComicGen`] trait, injected as an
//! `Arc<dyn ComicGen>` capability handle so tests substitute a fake
//! gateway. [`GeminiClient`] is the single concrete provider, configured
//! from environment variables. No retries anywhere: a failure surfaces
//! whole and the user re-triggers the action.

pub mod config;
pub mod gemini;
pub mod types;

pub use config::GenConfig;
pub use gemini::GeminiClient;
pub use types::{ComicGen, GenError, PanelScript};
