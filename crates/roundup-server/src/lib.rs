pub mod embed;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;

/// Build the axum Router with the form routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: state::AppState) -> Router {
    Router::new()
        .route("/", get(routes::form::home))
        .route("/form", post(routes::form::submit))
        .route("/api/schedule", get(routes::schedule::get_schedule))
        .fallback(embed::static_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the form server on `port`.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(root, listener).await
}

/// Start the form server on a pre-bound listener.
///
/// Lets the caller read the actual port first when binding port 0.
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(state::AppState::new(root));

    tracing::info!("roundup form server listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
