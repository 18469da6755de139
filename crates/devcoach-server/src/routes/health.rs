use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /api/health: liveness check.
pub async fn get_health(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "environment": app.config.server.environment,
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}
