use axum::Json;
use devcoach_core::signals::{self, BlockSpan, CoachingSignals, PhaseBalance};

/// POST /api/analytics/recommendations: habit suggestions for the given
/// signals.
pub async fn recommendations(Json(body): Json<CoachingSignals>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "signals": body,
        "recommendations": signals::build_recommendations(&body),
    }))
}

#[derive(serde::Deserialize)]
pub struct BalanceBody {
    #[serde(default)]
    pub blocks: Vec<BlockSpan>,
}

/// POST /api/analytics/balance: minutes and block counts per phase.
pub async fn balance(Json(body): Json<BalanceBody>) -> Json<Vec<PhaseBalance>> {
    Json(signals::phase_balance(&body.blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn weak_focus_gets_advice() {
        let body = CoachingSignals {
            annotation_rate: Some(0.9),
            focus_score: 0.1,
            consistency_score: 0.9,
            weekly_puzzle_streak: 5,
        };
        let json = recommendations(Json(body)).await.0;
        let recs = json["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 1);
        assert!(recs[0].as_str().unwrap().contains("Pomodoro"));
    }

    #[tokio::test]
    async fn balance_groups_by_phase() {
        let body: BalanceBody = serde_json::from_value(serde_json::json!({
            "blocks": [
                {"phase": "review", "started_at": "2024-05-01T09:00:00Z",
                 "ended_at": "2024-05-01T09:12:00Z"},
                {"phase": "planning"},
                {"phase": "review", "started_at": "2024-05-01T10:00:00Z",
                 "ended_at": "2024-05-01T10:03:00Z"}
            ]
        }))
        .unwrap();
        let phases = balance(Json(body)).await.0;
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].phase, "planning");
        assert_eq!(phases[0].total_minutes, 0.0);
        assert_eq!(phases[1].total_minutes, 15.0);
        assert_eq!(phases[1].block_count, 2);
    }
}
