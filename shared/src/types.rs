//! API request and response types

use crate::models::{Gender, MealType, Theme};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default page size for list endpoints
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Largest page a client may request
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Offset pagination parameters (`?skip=0&limit=100`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn offset(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 100, message = "Username too long"))]
    pub username: Option<String>,
}

/// Login request (JSON body)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login request in OAuth2 password-grant form encoding
///
/// `username` carries the account email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenFormRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub grant_type: Option<String>,
}

/// Refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Token pair returned by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Result of a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredAccount {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
}

// ============================================================================
// User Types
// ============================================================================

/// Account profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    /// Body weight in kg
    pub weight: Option<f64>,
    /// Height in cm
    pub height: Option<f64>,
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<i32>,
    pub health_problems: Vec<String>,
    pub profile_completed: bool,
    pub saved_days_count: i32,
    pub day_streak: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<i32>,
    pub health_problems: Option<Vec<String>>,
    pub profile_completed: Option<bool>,
}

// ============================================================================
// Goal Types
// ============================================================================

/// Create goal request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    pub goal_weight: Option<f64>,
    pub goal_exercise_frequency: Option<i32>,
    pub goal_exercise_minutes: Option<i32>,
    /// Daily water intake target in ml
    pub goal_water_intake: Option<i32>,
    pub effective_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Update goal request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGoalRequest {
    pub goal_weight: Option<f64>,
    pub goal_exercise_frequency: Option<i32>,
    pub goal_exercise_minutes: Option<i32>,
    pub goal_water_intake: Option<i32>,
    pub effective_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// Goal list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalsListQuery {
    pub active_only: Option<bool>,
}

/// Goal response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalResponse {
    pub id: String,
    pub goal_weight: Option<f64>,
    pub goal_exercise_frequency: Option<i32>,
    pub goal_exercise_minutes: Option<i32>,
    pub goal_water_intake: Option<i32>,
    pub effective_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Food Log and Meal Types
// ============================================================================

/// Open (or fetch) the food log for a day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFoodLogRequest {
    pub date: NaiveDate,
}

/// Food log response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogResponse {
    pub id: String,
    pub date: NaiveDate,
    pub meal_count: i32,
}

/// Create meal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMealRequest {
    pub food_log_id: String,
    pub food_name: Option<String>,
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub calories: Option<i32>,
    pub image_url: Option<String>,
}

/// Update meal request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMealRequest {
    pub food_name: Option<String>,
    pub meal_type: Option<MealType>,
    pub calories: Option<i32>,
    pub image_url: Option<String>,
}

/// Meal response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealResponse {
    pub id: String,
    pub food_log_id: String,
    pub food_name: Option<String>,
    pub meal_type: Option<MealType>,
    pub calories: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Daily Task Types
// ============================================================================

/// Open (or fetch) the task sheet for a day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDailyTaskRequest {
    pub date: NaiveDate,
}

/// Daily task response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTaskResponse {
    pub id: String,
    pub date: NaiveDate,
}

/// Create task request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub daily_task_id: String,
    pub task_type: Option<String>,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    #[serde(default)]
    pub completed: bool,
    pub task_quality: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Update task request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub task_type: Option<String>,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    pub completed: Option<bool>,
    pub task_quality: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Task response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: String,
    pub daily_task_id: String,
    pub task_type: Option<String>,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    pub completed: bool,
    pub task_quality: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Achievement Types
// ============================================================================

/// Create achievement request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAchievementRequest {
    #[serde(rename = "type")]
    pub achievement_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: Option<i32>,
    pub current: Option<i32>,
}

/// Update achievement request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAchievementRequest {
    pub current: Option<i32>,
    pub achieved: Option<bool>,
    pub achieved_at: Option<DateTime<Utc>>,
}

/// Progress increment request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementProgressRequest {
    /// Defaults to 1
    pub amount: Option<i32>,
}

/// Achievement response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub achievement_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: Option<i32>,
    pub current: i32,
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Nutrition Types
// ============================================================================

/// Add an entry to the nutrition lookup table (values per serving)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNutritionItemRequest {
    pub food_name: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
}

/// Update a nutrition entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNutritionItemRequest {
    pub food_name: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
}

/// Nutrition search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionSearchQuery {
    pub food_name: String,
}

/// Nutrition entry response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionItemResponse {
    pub id: String,
    pub food_name: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

// ============================================================================
// Preference Types
// ============================================================================

fn default_true() -> bool {
    true
}

/// Create preferences request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePreferencesRequest {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    pub reminder_times: Option<String>,
}

impl Default for CreatePreferencesRequest {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            notifications_enabled: true,
            reminder_times: None,
        }
    }
}

/// Update preferences request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<Theme>,
    pub notifications_enabled: Option<bool>,
    pub reminder_times: Option<String>,
}

/// Preferences response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    pub id: String,
    pub theme: Theme,
    pub notifications_enabled: bool,
    pub reminder_times: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Statistics Types
// ============================================================================

/// Update app statistics; absent counters are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatisticsRequest {
    pub total_users: Option<i32>,
    pub total_meals_logged: Option<i32>,
    pub total_days_tracked: Option<i32>,
    pub api_calls_this_month: Option<i32>,
}

/// App statistics response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub id: String,
    pub total_users: i32,
    pub total_meals_logged: i32,
    pub total_days_tracked: i32,
    pub api_calls_this_month: i32,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_list_query_clamps() {
        let query = ListQuery {
            skip: Some(-5),
            limit: Some(10_000),
        };
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), MAX_PAGE_LIMIT);

        let query = ListQuery {
            skip: None,
            limit: Some(0),
        };
        assert_eq!(query.limit(), 1);
    }

    #[test]
    fn test_register_request_validates_email() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            username: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_achievement_type_uses_type_key() {
        let req: CreateAchievementRequest =
            serde_json::from_str(r#"{"type": "streak", "target": 7}"#).unwrap();
        assert_eq!(req.achievement_type.as_deref(), Some("streak"));
        assert_eq!(req.target, Some(7));
    }

    #[test]
    fn test_preferences_defaults() {
        let req: CreatePreferencesRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.theme, Theme::System);
        assert!(req.notifications_enabled);
    }

    #[test]
    fn test_token_form_grant_type_optional() {
        let req: TokenFormRequest =
            serde_json::from_str(r#"{"username": "a@b.co", "password": "secret1"}"#).unwrap();
        assert!(req.grant_type.is_none());
    }
}
