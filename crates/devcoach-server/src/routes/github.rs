use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use devcoach_core::normalize::{self, RawIssue, RawPull, RepoHealth};
use devcoach_core::types::QueueItem;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct NormalizeBody {
    pub username: String,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    #[serde(default)]
    pub pulls: Vec<RawPull>,
}

/// POST /api/github/normalize: raw GitHub issue and pull payloads in,
/// queue items out.
pub async fn normalize_queue(
    State(app): State<AppState>,
    Json(body): Json<NormalizeBody>,
) -> Result<Json<Vec<QueueItem>>, AppError> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(AppError::bad_request("username must not be empty"));
    }
    app.check_rate(Some(username))?;
    Ok(Json(normalize::normalize_queue(
        &body.issues,
        &body.pulls,
        username,
    )))
}

#[derive(serde::Deserialize)]
pub struct HealthBody {
    pub username: String,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    #[serde(default)]
    pub pulls: Vec<RawPull>,
    /// Reference time for staleness; the server clock when omitted.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// POST /api/github/health: hygiene report over the same payloads.
pub async fn repo_health(
    State(app): State<AppState>,
    Json(body): Json<HealthBody>,
) -> Result<Json<RepoHealth>, AppError> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(AppError::bad_request("username must not be empty"));
    }
    app.check_rate(Some(username))?;
    let now = body.now.unwrap_or_else(Utc::now);
    let health = normalize::repo_health(&body.issues, &body.pulls, username, now);
    tracing::debug!(total = health.total_hygiene_issues, "repo health");
    Ok(Json(health))
}
