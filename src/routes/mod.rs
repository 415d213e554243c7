//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API under `/api`, health probe at `/healthz`, and the browser UI
//! (one static page owning rendering, dialogs, and the PDF export) served
//! as static files from `static/` for every other path.

pub mod strips;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let ui_service = ServeDir::new(ui_dir()).append_index_html_on_directories(true);

    Router::new()
        .route("/api/strips", post(strips::create_strip))
        .route("/api/strips/{id}", get(strips::get_strip))
        .route(
            "/api/strips/{id}/panels",
            post(strips::generate_panel).delete(strips::restart),
        )
        .route("/api/strips/{id}/panels/{panel_id}", patch(strips::edit_panel_text))
        .route("/api/strips/{id}/panels/{panel_id}/redo", post(strips::redo_panel))
        .route("/api/strips/{id}/suggest", post(strips::suggest))
        .route("/healthz", get(healthz))
        .layer(cors)
        .fallback_service(ui_service)
        .with_state(state)
}

/// Resolve the static UI directory.
fn ui_dir() -> PathBuf {
    std::env::var("UI_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
