use axum::http::StatusCode;
use devcoach_core::config::Config;
use devcoach_server::state::AppState;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn router_with(config: Config) -> axum::Router {
    devcoach_server::build_router(AppState::new(std::path::PathBuf::from("."), config))
}

fn router() -> axum::Router {
    router_with(Config::default())
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn sample_queue() -> serde_json::Value {
    serde_json::json!([
        {"type": "issue", "number": 1, "title": "big refactor", "story_points": 13},
        {"type": "issue", "number": 2, "title": "typo", "story_points": 1},
        {"type": "pull_request", "number": 3, "title": "review me",
         "awaiting_review_from_user": true},
        {"type": "issue", "number": 4, "title": "prod down", "priority": "Critical",
         "story_points": 2, "user_commented": true},
        {"number": 5}
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_ok() {
    let (status, json) = get(router(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn config_reflects_saved_file() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.server.environment = "staging".to_string();
    config.save(dir.path()).unwrap();

    let state = AppState::load(dir.path().to_path_buf()).unwrap();
    let app = devcoach_server::build_router(state);
    let (status, json) = get(app, "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["server"]["environment"], "staging");
}

#[tokio::test]
async fn tier_endpoint() {
    let (status, json) = get(router(), "/api/queue/tier?story_points=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tier"], 4);

    let (_, json) = get(router(), "/api/queue/tier").await;
    assert_eq!(json["tier"], 3);
}

#[tokio::test]
async fn scored_queue_sorts_everything() {
    let (status, json) = post_json(
        router(),
        "/api/queue/scored",
        serde_json::json!({"username": "alice", "items": sample_queue()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 5);
    let numbers: Vec<u64> = items.iter().map(|i| i["number"].as_u64().unwrap()).collect();
    // 4: 0.5*1.5*2=1.5, 2: 1.0, 3: 1.3/3, 5: 1/3, 1: 0.2
    assert_eq!(numbers, vec![4, 2, 3, 5, 1]);
    assert_eq!(items[0]["score"], 1.5);
}

#[tokio::test]
async fn recommendations_return_top_three_with_reasons() {
    let (status, json) = post_json(
        router(),
        "/api/queue/recommendations",
        serde_json::json!({"username": "alice", "items": sample_queue()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recs = json.as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["number"], 4);
    assert_eq!(recs[0]["priority"], "critical");
    assert_eq!(
        recs[0]["explanation"],
        "Recommended because: marked as critical/blocker; \
         you have prior context from a comment; \
         small scope (2 SP — good for a focused session)."
    );
    assert_eq!(
        recs[2]["explanation"],
        "Recommended because: your review has been requested."
    );
}

#[tokio::test]
async fn recommendations_of_empty_queue() {
    let (status, json) = post_json(
        router(),
        "/api/queue/recommendations",
        serde_json::json!({"username": "alice", "items": []}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn rate_limit_returns_429() {
    let mut config = Config::default();
    config.rate_limit.requests_per_window = 2;
    let app = router_with(config);

    let body = serde_json::json!({"username": "bob", "items": []});
    for _ in 0..2 {
        let (status, _) = post_json(app.clone(), "/api/queue/recommendations", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, json) = post_json(app.clone(), "/api/queue/recommendations", body).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(json["error"].as_str().unwrap().contains("rate limit"));

    // A different user still has budget.
    let (status, _) = post_json(
        app,
        "/api/queue/recommendations",
        serde_json::json!({"username": "carol", "items": []}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn normalize_then_recommend() {
    let (status, items) = post_json(
        router(),
        "/api/github/normalize",
        serde_json::json!({
            "username": "alice",
            "issues": [
                {"number": 10, "title": "small", "html_url": "u10",
                 "labels": [{"name": "sp:1"}]},
                {"number": 11, "title": "listed pr", "html_url": "u11",
                 "pull_request": {}}
            ],
            "pulls": [
                {"number": 11, "title": "listed pr", "html_url": "u11",
                 "requested_reviewers": [{"login": "alice"}]}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items.as_array().unwrap().len(), 2);
    assert_eq!(items[1]["type"], "pull_request");
    assert_eq!(items[1]["awaiting_review_from_user"], true);

    let (status, recs) = post_json(
        router(),
        "/api/queue/recommendations",
        serde_json::json!({"username": "alice", "items": items}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recs[0]["number"], 10);
}

#[tokio::test]
async fn normalize_requires_username() {
    let (status, json) = post_json(
        router(),
        "/api/github/normalize",
        serde_json::json!({"username": "", "issues": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn coaching_level_endpoint() {
    let (status, json) = post_json(
        router(),
        "/api/coaching/level",
        serde_json::json!({"prs_merged_7d": 3, "prs_reviewed_7d": 5, "annotation_rate": 0.8}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["coaching_level"], "peter");

    let (_, json) = post_json(
        router(),
        "/api/coaching/level",
        serde_json::json!({"prs_merged_7d": 3, "prs_reviewed_7d": 4, "annotation_rate": 0.9}),
    )
    .await;
    assert_eq!(json["coaching_level"], "ransom");
}

#[tokio::test]
async fn should_prompt_endpoint() {
    let (status, json) = post_json(
        router(),
        "/api/coaching/should-prompt",
        serde_json::json!({"level": "peter", "idle_minutes": 16, "phase": "coding"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["should_prompt"], true);
    assert_eq!(json["prompts"].as_array().unwrap().len(), 2);

    let (_, json) = post_json(
        router(),
        "/api/coaching/should-prompt",
        serde_json::json!({"level": "peter", "idle_minutes": 20, "phase": "planning"}),
    )
    .await;
    assert_eq!(json["should_prompt"], false);
}

#[tokio::test]
async fn should_prompt_rejects_unknown_level() {
    let (status, _) = post_json(
        router(),
        "/api/coaching/should-prompt",
        serde_json::json!({"level": "wendy", "idle_minutes": 0, "phase": "coding"}),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn stuck_check_endpoint() {
    let (status, json) = get(
        router(),
        "/api/coaching/stuck-check?level=ransom&minutes_idle=25",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["should_prompt"], true);
    assert_eq!(json["phase"], "idle");
    assert_eq!(json["suggested_trigger"], "stuck");

    let (status, _) = get(router(), "/api/coaching/stuck-check?level=nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn prompts_endpoint() {
    let (status, json) = get(router(), "/api/coaching/prompts?level=peter&phase=pre_merge").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prompts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn analytics_recommendations_endpoint() {
    let (status, json) = post_json(
        router(),
        "/api/analytics/recommendations",
        serde_json::json!({
            "annotation_rate": 0.5,
            "focus_score": 0.9,
            "consistency_score": 0.9,
            "weekly_puzzle_streak": 5
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recs = json["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert!(recs[0].as_str().unwrap().starts_with("Comment on issues"));
}

#[tokio::test]
async fn github_health_endpoint() {
    let (status, json) = post_json(
        router(),
        "/api/github/health",
        serde_json::json!({
            "username": "alice",
            "now": "2024-05-10T00:00:00Z",
            "issues": [
                {"number": 1, "title": "covered"},
                {"number": 2, "title": "forgotten", "updated_at": "2024-04-20T08:00:00Z"}
            ],
            "pulls": [
                {"number": 3, "title": "Fix the thing", "body": "fixes #1",
                 "requested_reviewers": [{"login": "alice"}]},
                {"number": 4, "title": "untracked change"},
                {"number": 5, "title": "spike", "draft": true}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["issues_without_prs"][0]["number"], 2);
    assert_eq!(json["stale_issues"][0]["number"], 2);
    assert_eq!(json["prs_without_issues"].as_array().unwrap().len(), 1);
    assert_eq!(json["prs_without_issues"][0]["number"], 4);
    assert_eq!(json["prs_awaiting_review"][0]["number"], 3);
    assert_eq!(json["total_hygiene_issues"], 4);
}

#[tokio::test]
async fn analytics_balance_endpoint() {
    let (status, json) = post_json(
        router(),
        "/api/analytics/balance",
        serde_json::json!({
            "blocks": [
                {"phase": "coding", "started_at": "2024-05-01T09:00:00Z",
                 "ended_at": "2024-05-01T09:25:00Z"},
                {"started_at": "2024-05-01T10:00:00Z"}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!([
            {"phase": "coding", "total_minutes": 25.0, "block_count": 1},
            {"phase": "unknown", "total_minutes": 0.0, "block_count": 1}
        ])
    );
}
