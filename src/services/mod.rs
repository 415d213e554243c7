//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the business logic so route handlers stay focused
//! on protocol translation: `strip` is the panel sequence store, `story`
//! is the continuity controller deciding what the generative model sees.

pub mod story;
pub mod strip;
