use axum::extract::{Query, State};
use axum::Json;
use devcoach_core::coaching::{self, StuckCheck};
use devcoach_core::types::{ActivityMetrics, CoachingLevel};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct LevelBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(flatten)]
    pub activity: ActivityMetrics,
}

/// POST /api/coaching/level: classify weekly activity.
pub async fn detect_level(
    State(app): State<AppState>,
    Json(body): Json<LevelBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.check_rate(body.username.as_deref())?;
    let level = coaching::detect_coaching_level(&body.activity);
    Ok(Json(serde_json::json!({ "coaching_level": level })))
}

#[derive(serde::Deserialize)]
pub struct ShouldPromptBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub level: CoachingLevel,
    #[serde(default)]
    pub idle_minutes: u32,
    #[serde(default)]
    pub phase: String,
}

/// POST /api/coaching/should-prompt: whether to interrupt now, with the
/// nudges to choose from when the answer is yes.
pub async fn should_prompt(
    State(app): State<AppState>,
    Json(body): Json<ShouldPromptBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.check_rate(body.username.as_deref())?;
    let prompt = coaching::should_prompt(body.level, body.idle_minutes, &body.phase);
    let prompts: &[&str] = if prompt {
        coaching::prompt_nudges(body.level, &body.phase)
    } else {
        &[]
    };
    Ok(Json(serde_json::json!({
        "should_prompt": prompt,
        "coaching_level": body.level,
        "prompts": prompts,
    })))
}

#[derive(serde::Deserialize)]
pub struct StuckParams {
    pub level: Option<String>,
    #[serde(default)]
    pub minutes_idle: u32,
    pub phase: Option<String>,
}

fn parse_level(level: Option<&str>) -> Result<CoachingLevel, AppError> {
    match level {
        Some(l) => Ok(l.parse()?),
        None => Ok(CoachingLevel::default()),
    }
}

/// GET /api/coaching/stuck-check?level=&minutes_idle=&phase=
pub async fn stuck_check(Query(params): Query<StuckParams>) -> Result<Json<StuckCheck>, AppError> {
    let level = parse_level(params.level.as_deref())?;
    Ok(Json(coaching::stuck_check(
        level,
        params.minutes_idle,
        params.phase.as_deref(),
    )))
}

#[derive(serde::Deserialize)]
pub struct PromptParams {
    pub level: Option<String>,
    pub phase: Option<String>,
}

/// GET /api/coaching/prompts?level=&phase=
pub async fn get_prompts(
    Query(params): Query<PromptParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let level = parse_level(params.level.as_deref())?;
    let phase = params.phase.as_deref().unwrap_or("default");
    Ok(Json(serde_json::json!({
        "coaching_level": level,
        "phase": phase,
        "prompts": coaching::coaching_prompts(level, phase),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcoach_core::config::Config;

    fn app() -> AppState {
        AppState::new(std::path::PathBuf::from("/tmp/test"), Config::default())
    }

    #[tokio::test]
    async fn level_reads_flattened_metrics() {
        let body: LevelBody = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "prs_merged_7d": 3,
            "prs_reviewed_7d": 5,
            "annotation_rate": 0.8
        }))
        .unwrap();
        let json = detect_level(State(app()), Json(body)).await.unwrap().0;
        assert_eq!(json["coaching_level"], "peter");
    }

    #[tokio::test]
    async fn ransom_at_pomodoro_boundary_gets_nudges() {
        let body = ShouldPromptBody {
            username: None,
            level: CoachingLevel::Ransom,
            idle_minutes: 25,
            phase: "coding".to_string(),
        };
        let json = should_prompt(State(app()), Json(body)).await.unwrap().0;
        assert_eq!(json["should_prompt"], true);
        assert_eq!(json["prompts"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn stuck_peter_gets_stuck_nudges() {
        let body = ShouldPromptBody {
            username: None,
            level: CoachingLevel::Peter,
            idle_minutes: 16,
            phase: "coding".to_string(),
        };
        let json = should_prompt(State(app()), Json(body)).await.unwrap().0;
        assert_eq!(json["should_prompt"], true);
        let prompts = json["prompts"].as_array().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].as_str().unwrap().contains("blocked"));
    }

    #[tokio::test]
    async fn no_prompt_means_no_nudges() {
        let body = ShouldPromptBody {
            username: None,
            level: CoachingLevel::Peter,
            idle_minutes: 15,
            phase: "coding".to_string(),
        };
        let json = should_prompt(State(app()), Json(body)).await.unwrap().0;
        assert_eq!(json["should_prompt"], false);
        assert!(json["prompts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stuck_check_rejects_unknown_level() {
        let params = StuckParams {
            level: Some("wendy".to_string()),
            minutes_idle: 3,
            phase: None,
        };
        assert!(stuck_check(Query(params)).await.is_err());
    }

    #[tokio::test]
    async fn prompts_default_to_ransom_encouragement() {
        let params = PromptParams {
            level: None,
            phase: None,
        };
        let json = get_prompts(Query(params)).await.unwrap().0;
        assert_eq!(json["coaching_level"], "ransom");
        assert_eq!(json["prompts"].as_array().unwrap().len(), 2);
    }
}
