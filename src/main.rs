use std::sync::Arc;

use hqgen::{genai, routes, state};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Initialize the generation client (non-fatal: generation endpoints
    // answer E_GEN_NOT_CONFIGURED if the API key is missing).
    let genai = match genai::GeminiClient::from_env() {
        Ok(client) => {
            tracing::info!(text_model = client.text_model(), "generation client initialized");
            Some(Arc::new(client) as Arc<dyn genai::ComicGen>)
        }
        Err(e) => {
            tracing::warn!(error = %e, "generation client not configured — panel generation disabled");
            None
        }
    };

    let state = state::AppState::new(genai);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "hqgen listening");
    axum::serve(listener, app).await.expect("server failed");
}
