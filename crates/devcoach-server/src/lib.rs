pub mod error;
pub mod routes;
pub mod state;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use devcoach_core::config::Config;
use std::path::PathBuf;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = &config.server.frontend_origins;
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: state::AppState) -> Router {
    let cors = cors_layer(&app_state.config);

    Router::new()
        .route("/api/health", get(routes::health::get_health))
        .route("/api/config", get(routes::config::get_config))
        // Queue scoring
        .route("/api/queue/tier", get(routes::queue::get_tier))
        .route("/api/queue/scored", post(routes::queue::scored_queue))
        .route(
            "/api/queue/recommendations",
            post(routes::queue::recommendations),
        )
        .route(
            "/api/github/normalize",
            post(routes::github::normalize_queue),
        )
        .route("/api/github/health", post(routes::github::repo_health))
        // Coaching
        .route("/api/coaching/level", post(routes::coaching::detect_level))
        .route(
            "/api/coaching/should-prompt",
            post(routes::coaching::should_prompt),
        )
        .route(
            "/api/coaching/stuck-check",
            get(routes::coaching::stuck_check),
        )
        .route("/api/coaching/prompts", get(routes::coaching::get_prompts))
        // Analytics
        .route(
            "/api/analytics/recommendations",
            post(routes::analytics::recommendations),
        )
        .route("/api/analytics/balance", post(routes::analytics::balance))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the devcoach API server.
///
/// `port` overrides `server.port` from the config; pass `Some(0)` to let the
/// OS pick a free port.
pub async fn serve(root: PathBuf, port: Option<u16>) -> anyhow::Result<()> {
    let app_state = state::AppState::load(root)?;
    let port = port.unwrap_or(app_state.config.server.port);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener).await
}

/// Start the server on a pre-bound listener, so the caller can read the
/// actual port first.
pub async fn serve_on(
    app_state: state::AppState,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    tracing::info!(
        root = %app_state.root.display(),
        environment = %app_state.config.server.environment,
        "devcoach API listening on http://localhost:{actual_port}"
    );

    let app = build_router(app_state);
    axum::serve(listener, app).await?;
    Ok(())
}
