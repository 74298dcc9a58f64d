//! Integration tests for food logs, meals and their counters

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_food_log_is_idempotent_per_date() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (status, first) = app
        .post("/api/v1/food-logs", token, json!({"date": "2024-03-01"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["meal_count"], 0);

    let (_, second) = app
        .post("/api/v1/food-logs", token, json!({"date": "2024-03-01"}))
        .await;
    assert_eq!(first["id"], second["id"]);

    let (status, by_date) = app.get("/api/v1/food-logs/date/2024-03-01", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_date["id"], first["id"]);

    let (_, me) = app.get("/api/v1/auth/me", token).await;
    assert_eq!(me["saved_days_count"], 1);
    assert_eq!(me["day_streak"], 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_consecutive_days_extend_streak() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    for date in ["2024-04-01", "2024-04-02", "2024-04-03"] {
        let (status, _) = app.post("/api/v1/food-logs", token, json!({"date": date})).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, me) = app.get("/api/v1/auth/me", token).await;
    assert_eq!(me["saved_days_count"], 3);
    assert_eq!(me["day_streak"], 3);

    app.post("/api/v1/food-logs", token, json!({"date": "2024-04-06"}))
        .await;
    let (_, me) = app.get("/api/v1/auth/me", token).await;
    assert_eq!(me["saved_days_count"], 4);
    assert_eq!(me["day_streak"], 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_count_follows_creates_and_deletes() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (_, log) = app
        .post("/api/v1/food-logs", token, json!({"date": "2024-05-10"}))
        .await;
    let log_id = log["id"].as_str().unwrap();

    let (status, meal) = app
        .post(
            "/api/v1/meals",
            token,
            json!({
                "food_log_id": log_id,
                "food_name": "Oatmeal",
                "meal_type": "breakfast",
                "calories": 320
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(meal["meal_type"], "breakfast");

    let (_, log) = app.get("/api/v1/food-logs/date/2024-05-10", token).await;
    assert_eq!(log["meal_count"], 1);

    let (_, meals) = app
        .get(&format!("/api/v1/food-logs/{}/meals", log_id), token)
        .await;
    assert_eq!(meals.as_array().unwrap().len(), 1);

    let meal_id = meal["id"].as_str().unwrap();
    let (status, updated) = app
        .put(
            &format!("/api/v1/meals/{}", meal_id),
            token,
            json!({"calories": 280}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["calories"], 280);
    assert_eq!(updated["food_name"], "Oatmeal");

    let (status, _) = app.delete(&format!("/api/v1/meals/{}", meal_id), token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&format!("/api/v1/meals/{}", meal_id), token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, log) = app.get("/api/v1/food-logs/date/2024-05-10", token).await;
    assert_eq!(log["meal_count"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_count_never_negative() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (_, log) = app
        .post("/api/v1/food-logs", token, json!({"date": "2024-05-11"}))
        .await;
    let log_id = log["id"].as_str().unwrap();
    let (_, meal) = app
        .post("/api/v1/meals", token, json!({"food_log_id": log_id}))
        .await;

    sqlx::query("UPDATE food_logs SET meal_count = 0 WHERE id = $1")
        .bind(uuid::Uuid::parse_str(log_id).unwrap())
        .execute(&app.pool)
        .await
        .unwrap();

    let meal_id = meal["id"].as_str().unwrap();
    app.delete(&format!("/api/v1/meals/{}", meal_id), token).await;

    let (_, log) = app.get("/api/v1/food-logs/date/2024-05-11", token).await;
    assert_eq!(log["meal_count"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_other_users_food_log_is_not_found() {
    let app = common::TestApp::new().await;
    let owner = app.register_user().await;
    let intruder = app.register_user().await;

    let (_, log) = app
        .post(
            "/api/v1/food-logs",
            Some(&owner.access_token),
            json!({"date": "2024-06-01"}),
        )
        .await;
    let log_id = log["id"].as_str().unwrap();

    let (status, _) = app
        .post(
            "/api/v1/meals",
            Some(&intruder.access_token),
            json!({"food_log_id": log_id, "calories": 100}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .get(
            &format!("/api/v1/food-logs/{}/meals", log_id),
            Some(&intruder.access_token),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_negative_calories_rejected() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    let token = Some(user.access_token.as_str());

    let (_, log) = app
        .post("/api/v1/food-logs", token, json!({"date": "2024-06-02"}))
        .await;

    let (status, err) = app
        .post(
            "/api/v1/meals",
            token,
            json!({"food_log_id": log["id"], "calories": -5}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["field"], "calories");
}
