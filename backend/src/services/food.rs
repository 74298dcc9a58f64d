//! Food log and meal service

use super::parse_id;
use crate::error::ApiError;
use crate::repositories::{
    CreateMeal, FoodLogRecord, FoodLogRepository, MealRecord, MealRepository, UpdateMeal,
};
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;
use wellness_tracker_shared::{
    CreateMealRequest, FieldError, FoodLogResponse, ListQuery, MealResponse, MealType,
    UpdateMealRequest,
};

pub struct FoodService;

impl FoodService {
    /// Open the food log for a date; repeated calls return the same log
    pub async fn open_log(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<FoodLogResponse, ApiError> {
        let opened = FoodLogRepository::open(pool, user_id, date).await?;
        if opened.created {
            debug!(user_id = %user_id, %date, "Food log opened");
        }
        Ok(log_response(opened.log))
    }

    pub async fn list_logs(
        pool: &PgPool,
        user_id: Uuid,
        query: &ListQuery,
    ) -> Result<Vec<FoodLogResponse>, ApiError> {
        let logs = FoodLogRepository::list(pool, user_id, query.offset(), query.limit()).await?;
        Ok(logs.into_iter().map(log_response).collect())
    }

    pub async fn log_by_date(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<FoodLogResponse, ApiError> {
        FoodLogRepository::find_by_date(pool, user_id, date)
            .await?
            .map(log_response)
            .ok_or_else(log_not_found)
    }

    pub async fn meals_for_log(
        pool: &PgPool,
        user_id: Uuid,
        food_log_id: &str,
    ) -> Result<Vec<MealResponse>, ApiError> {
        let food_log_id = parse_id(food_log_id, "food log")?;
        if FoodLogRepository::find(pool, user_id, food_log_id).await?.is_none() {
            return Err(log_not_found());
        }

        let meals = MealRepository::list_for_food_log(pool, user_id, food_log_id).await?;
        Ok(meals.into_iter().map(meal_response).collect())
    }

    pub async fn create_meal(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateMealRequest,
    ) -> Result<MealResponse, ApiError> {
        let food_log_id = parse_id(&req.food_log_id, "food log")?;
        let calories = req.calories.unwrap_or(0);
        validate_calories(calories)?;

        let meal = MealRepository::create(
            pool,
            CreateMeal {
                user_id,
                food_log_id,
                food_name: req.food_name,
                meal_type: req.meal_type.map(|t| t.as_str().to_string()),
                calories,
                image_url: req.image_url,
            },
        )
        .await?
        .ok_or_else(log_not_found)?;

        Ok(meal_response(meal))
    }

    pub async fn list_meals(
        pool: &PgPool,
        user_id: Uuid,
        query: &ListQuery,
    ) -> Result<Vec<MealResponse>, ApiError> {
        let meals =
            MealRepository::list_for_user(pool, user_id, query.offset(), query.limit()).await?;
        Ok(meals.into_iter().map(meal_response).collect())
    }

    pub async fn update_meal(
        pool: &PgPool,
        user_id: Uuid,
        id: &str,
        req: UpdateMealRequest,
    ) -> Result<MealResponse, ApiError> {
        let id = parse_id(id, "meal")?;
        if let Some(calories) = req.calories {
            validate_calories(calories)?;
        }

        let updates = UpdateMeal {
            food_name: req.food_name,
            meal_type: req.meal_type.map(|t| t.as_str().to_string()),
            calories: req.calories,
            image_url: req.image_url,
        };

        MealRepository::update(pool, user_id, id, updates)
            .await?
            .map(meal_response)
            .ok_or_else(meal_not_found)
    }

    pub async fn delete_meal(pool: &PgPool, user_id: Uuid, id: &str) -> Result<(), ApiError> {
        let id = parse_id(id, "meal")?;
        if !MealRepository::delete(pool, user_id, id).await? {
            return Err(meal_not_found());
        }
        Ok(())
    }
}

fn validate_calories(calories: i32) -> Result<(), FieldError> {
    if calories < 0 {
        return Err(FieldError::new("calories", "Cannot be negative"));
    }
    Ok(())
}

fn log_not_found() -> ApiError {
    ApiError::NotFound("Food log not found".to_string())
}

fn meal_not_found() -> ApiError {
    ApiError::NotFound("Meal not found".to_string())
}

fn log_response(log: FoodLogRecord) -> FoodLogResponse {
    FoodLogResponse {
        id: log.id.to_string(),
        date: log.log_date,
        meal_count: log.meal_count,
    }
}

fn meal_response(meal: MealRecord) -> MealResponse {
    MealResponse {
        id: meal.id.to_string(),
        food_log_id: meal.food_log_id.to_string(),
        food_name: meal.food_name,
        meal_type: meal.meal_type.as_deref().and_then(|t| t.parse::<MealType>().ok()),
        calories: meal.calories,
        image_url: meal.image_url,
        created_at: meal.created_at,
        updated_at: meal.updated_at,
    }
}
