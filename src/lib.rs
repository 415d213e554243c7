//! AI comic-strip generator: an axum server that turns user prompts into
//! comic panels via a generative text + image gateway, keeps the growing
//! strip in memory per session, and serves the browser UI that renders
//! and exports it.

pub mod display;
pub mod error;
pub mod genai;
pub mod routes;
pub mod services;
pub mod state;
