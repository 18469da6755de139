use axum::extract::{Query, State};
use axum::Json;
use devcoach_core::scoring;
use devcoach_core::types::{EnrichedItem, QueueItem};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct TierParams {
    #[serde(default)]
    pub story_points: Option<i64>,
}

/// GET /api/queue/tier?story_points=<n>
pub async fn get_tier(Query(params): Query<TierParams>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "story_points": params.story_points,
        "tier": scoring::story_points_to_tier(params.story_points),
    }))
}

#[derive(serde::Deserialize)]
pub struct QueueBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub items: Vec<QueueItem>,
}

/// POST /api/queue/scored: every item, enriched and sorted by score.
pub async fn scored_queue(
    State(app): State<AppState>,
    Json(body): Json<QueueBody>,
) -> Result<Json<Vec<EnrichedItem>>, AppError> {
    app.check_rate(Some(&body.username))?;
    let scored = scoring::score_queue(&body.items, &body.username);
    tracing::debug!(items = scored.len(), "scored queue");
    Ok(Json(scored))
}

/// POST /api/queue/recommendations: the top three items for today.
pub async fn recommendations(
    State(app): State<AppState>,
    Json(body): Json<QueueBody>,
) -> Result<Json<Vec<EnrichedItem>>, AppError> {
    app.check_rate(Some(&body.username))?;
    Ok(Json(scoring::recommend_top_three(
        &body.items,
        &body.username,
    )))
}
