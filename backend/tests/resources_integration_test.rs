//! Integration tests for goals, tasks, achievements, nutrition,
//! preferences and statistics

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_goals_crud_and_active_filter() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (status, goal) = app
        .post(
            "/api/v1/goals",
            token,
            json!({"goal_weight": 70.0, "goal_exercise_frequency": 4, "goal_water_intake": 2000}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["is_active"], true);
    let goal_id = goal["id"].as_str().unwrap();

    let (status, updated) = app
        .put(
            &format!("/api/v1/goals/{}", goal_id),
            token,
            json!({"is_active": false}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["goal_weight"], 70.0);

    let (_, active) = app.get("/api/v1/goals", token).await;
    assert!(active.as_array().unwrap().is_empty());

    let (_, all) = app.get("/api/v1/goals?active_only=false", token).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = app
        .post("/api/v1/goals", token, json!({"goal_exercise_frequency": 9}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.delete(&format!("/api/v1/goals/{}", goal_id), token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/v1/goals/{}", goal_id), token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_daily_tasks_and_tasks() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let other = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (_, daily) = app
        .post("/api/v1/daily-tasks", token, json!({"date": "2024-07-01"}))
        .await;
    let (_, again) = app
        .post("/api/v1/daily-tasks", token, json!({"date": "2024-07-01"}))
        .await;
    assert_eq!(daily["id"], again["id"]);
    let daily_id = daily["id"].as_str().unwrap();

    let (status, task) = app
        .post(
            "/api/v1/tasks",
            token,
            json!({"daily_task_id": daily_id, "task_type": "water", "value_number": 1.5}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["completed"], false);
    let task_id = task["id"].as_str().unwrap();

    let (status, done) = app
        .put(
            &format!("/api/v1/tasks/{}", task_id),
            token,
            json!({"completed": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["completed"], true);

    let (_, tasks) = app
        .get(&format!("/api/v1/daily-tasks/{}/tasks", daily_id), token)
        .await;
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    let (status, _) = app
        .put(
            &format!("/api/v1/tasks/{}", task_id),
            Some(&other.access_token),
            json!({"completed": false}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/api/v1/tasks",
            Some(&other.access_token),
            json!({"daily_task_id": daily_id}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_partial_task_update_keeps_interval_ordered() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (_, daily) = app
        .post("/api/v1/daily-tasks", token, json!({"date": "2024-07-02"}))
        .await;
    let (_, task) = app
        .post(
            "/api/v1/tasks",
            token,
            json!({
                "daily_task_id": daily["id"],
                "task_type": "sleep",
                "started_at": "2024-07-02T22:00:00Z"
            }),
        )
        .await;
    let path = format!("/api/v1/tasks/{}", task["id"].as_str().unwrap());

    let (status, err) = app
        .put(&path, token, json!({"ended_at": "2024-07-02T21:00:00Z"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["field"], "ended_at");

    let (status, updated) = app
        .put(&path, token, json!({"ended_at": "2024-07-03T06:30:00Z"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["ended_at"].is_string());

    let (status, _) = app
        .put(&path, token, json!({"started_at": "2024-07-03T07:00:00Z"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_achievement_progress_marks_achieved() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (status, achievement) = app
        .post(
            "/api/v1/achievements",
            token,
            json!({"type": "streak", "name": "Three in a row", "target": 3}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let path = format!("/api/v1/achievements/{}/progress", achievement["id"].as_str().unwrap());

    let (_, step) = app.post(&path, token, json!({})).await;
    assert_eq!(step["current"], 1);
    assert_eq!(step["achieved"], false);

    let (_, done) = app.post(&path, token, json!({"amount": 2})).await;
    assert_eq!(done["current"], 3);
    assert_eq!(done["achieved"], true);
    assert!(done["achieved_at"].is_string());

    let (status, _) = app.post(&path, token, json!({"amount": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, streaks) = app.get("/api/v1/achievements?type=streak", token).await;
    assert_eq!(streaks.as_array().unwrap().len(), 1);
    let (_, others) = app.get("/api/v1/achievements?type=meals", token).await;
    assert!(others.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_unmarking_achievement_clears_timestamp() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (_, achievement) = app
        .post(
            "/api/v1/achievements",
            token,
            json!({"type": "meals", "name": "First meal", "target": 5}),
        )
        .await;
    let path = format!("/api/v1/achievements/{}", achievement["id"].as_str().unwrap());

    let (status, marked) = app.put(&path, token, json!({"achieved": true})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["achieved"], true);
    assert!(marked["achieved_at"].is_string());

    let (status, unmarked) = app.put(&path, token, json!({"achieved": false})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unmarked["achieved"], false);
    assert!(unmarked["achieved_at"].is_null());

    let (_, step) = app
        .post(&format!("{}/progress", path), token, json!({"amount": 2}))
        .await;
    assert_eq!(step["current"], 2);
    assert_eq!(step["achieved"], false);
    assert!(step["achieved_at"].is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_nutrition_search_and_conflict() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());
    let name = format!("Banana {}", uuid::Uuid::new_v4().simple());

    let (status, item) = app
        .post(
            "/api/v1/nutrition",
            token,
            json!({"food_name": name, "calories": 89.0, "protein": 1.1, "carbs": 22.8}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["protein"], 1.1);

    let (status, _) = app
        .post("/api/v1/nutrition", token, json!({"food_name": name}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let needle = name.to_uppercase();
    let (status, found) = app
        .get(
            &format!("/api/v1/nutrition/search?food_name={}", needle.replace(' ', "%20")),
            token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);

    let id = item["id"].as_str().unwrap();
    let (status, updated) = app
        .put(&format!("/api/v1/nutrition/{}", id), token, json!({"fiber": 2.6}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fiber"], 2.6);
    assert_eq!(updated["calories"], 89.0);

    let (status, _) = app
        .post(
            "/api/v1/nutrition",
            token,
            json!({"food_name": "Bad entry", "fat": -1.0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_nutrition_amount_beyond_column_rejected() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());
    let name = format!("Bulk {}", uuid::Uuid::new_v4().simple());

    let (status, err) = app
        .post(
            "/api/v1/nutrition",
            token,
            json!({"food_name": name, "calories": 1_000_000.0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(err["error"]["field"], "calories");

    let (status, item) = app
        .post(
            "/api/v1/nutrition",
            token,
            json!({"food_name": name, "calories": 999_999.99}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = app
        .put(
            &format!("/api/v1/nutrition/{}", item["id"].as_str().unwrap()),
            token,
            json!({"sugar": 5_000_000.0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["field"], "sugar");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_preferences_lifecycle() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (status, _) = app.get("/api/v1/preferences", token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, prefs) = app.post("/api/v1/preferences", token, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(prefs["theme"], "system");
    assert_eq!(prefs["notifications_enabled"], true);

    let (status, err) = app
        .post("/api/v1/preferences", token, json!({"theme": "dark"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"]["message"], "Preferences already exist");

    let (status, updated) = app
        .put("/api/v1/preferences", token, json!({"theme": "dark"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["theme"], "dark");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_statistics_upsert() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (status, stats) = app
        .put(
            "/api/v1/statistics",
            token,
            json!({"api_calls_this_month": 42}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["api_calls_this_month"], 42);

    let (status, read) = app.get("/api/v1/statistics", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["id"], stats["id"]);

    let (status, _) = app
        .put("/api/v1/statistics", token, json!({"total_users": -1}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
