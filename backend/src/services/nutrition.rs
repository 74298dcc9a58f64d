//! Nutrition lookup service

use super::{parse_id, to_decimal, to_f64};
use crate::error::ApiError;
use crate::repositories::{Nutrients, NutritionItemRecord, NutritionRepository};
use rust_decimal::Decimal;
use sqlx::PgPool;
use wellness_tracker_shared::validation::validate_nutrient_amount;
use wellness_tracker_shared::{
    CreateNutritionItemRequest, FieldError, NutritionItemResponse, UpdateNutritionItemRequest,
};

pub struct NutritionService;

impl NutritionService {
    pub async fn create(
        pool: &PgPool,
        req: CreateNutritionItemRequest,
    ) -> Result<NutritionItemResponse, ApiError> {
        let food_name = validate_food_name(&req.food_name)?;
        let nutrients = nutrients(
            req.calories,
            req.protein,
            req.carbs,
            req.fat,
            req.fiber,
            req.sugar,
        )?;

        let item = NutritionRepository::create(pool, &food_name, nutrients)
            .await
            .map_err(|e| {
                if crate::db::is_unique_violation_any(&e) {
                    ApiError::Conflict("Food already in nutrition database".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?;

        Ok(to_response(item))
    }

    pub async fn search(pool: &PgPool, food_name: &str) -> Result<Vec<NutritionItemResponse>, ApiError> {
        let query = food_name.trim();
        if query.is_empty() {
            return Err(FieldError::new("food_name", "Search term cannot be empty").into());
        }

        let items = NutritionRepository::search(pool, query).await?;
        Ok(items.into_iter().map(to_response).collect())
    }

    pub async fn get(pool: &PgPool, id: &str) -> Result<NutritionItemResponse, ApiError> {
        let id = parse_id(id, "nutrition item")?;
        NutritionRepository::find(pool, id)
            .await?
            .map(to_response)
            .ok_or_else(not_found)
    }

    pub async fn update(
        pool: &PgPool,
        id: &str,
        req: UpdateNutritionItemRequest,
    ) -> Result<NutritionItemResponse, ApiError> {
        let id = parse_id(id, "nutrition item")?;
        let food_name = req.food_name.as_deref().map(validate_food_name).transpose()?;
        let nutrients = nutrients(
            req.calories,
            req.protein,
            req.carbs,
            req.fat,
            req.fiber,
            req.sugar,
        )?;

        NutritionRepository::update(pool, id, food_name.as_deref(), nutrients)
            .await?
            .map(to_response)
            .ok_or_else(not_found)
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Nutrition item not found".to_string())
}

fn validate_food_name(name: &str) -> Result<String, FieldError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FieldError::new("food_name", "Food name cannot be empty"));
    }
    if name.chars().count() > 200 {
        return Err(FieldError::new("food_name", "Food name too long"));
    }
    Ok(name.to_string())
}

fn nutrients(
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
    fiber: Option<f64>,
    sugar: Option<f64>,
) -> Result<Nutrients, ApiError> {
    let fields = [
        ("calories", calories),
        ("protein", protein),
        ("carbs", carbs),
        ("fat", fat),
        ("fiber", fiber),
        ("sugar", sugar),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            validate_nutrient_amount(field, value)?;
        }
    }

    Ok(Nutrients {
        calories: amount("calories", calories)?,
        protein: amount("protein", protein)?,
        carbs: amount("carbs", carbs)?,
        fat: amount("fat", fat)?,
        fiber: amount("fiber", fiber)?,
        sugar: amount("sugar", sugar)?,
    })
}

/// Columns keep two decimal places
fn amount(field: &str, value: Option<f64>) -> Result<Option<Decimal>, ApiError> {
    Ok(to_decimal(field, value)?.map(|d| d.round_dp(2)))
}

fn to_response(item: NutritionItemRecord) -> NutritionItemResponse {
    NutritionItemResponse {
        id: item.id.to_string(),
        food_name: item.food_name,
        calories: to_f64(item.calories),
        protein: to_f64(item.protein),
        carbs: to_f64(item.carbs),
        fat: to_f64(item.fat),
        fiber: to_f64(item.fiber),
        sugar: to_f64(item.sugar),
        last_updated: item.last_updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_food_name() {
        assert_eq!(validate_food_name("  Banana ").unwrap(), "Banana");
        assert!(validate_food_name("   ").is_err());
        assert!(validate_food_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_negative_nutrient_rejected() {
        let err = nutrients(Some(100.0), Some(-1.0), None, None, None, None).unwrap_err();
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("protein")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_amount_too_large_for_column_rejected() {
        let err = nutrients(Some(1_000_000.0), None, None, None, None, None).unwrap_err();
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("calories")),
            other => panic!("unexpected error: {:?}", other),
        }

        let n = nutrients(Some(999_999.99), None, None, None, None, Some(12.346)).unwrap();
        assert_eq!(to_f64(n.calories), Some(999_999.99));
        assert_eq!(to_f64(n.sugar), Some(12.35));
    }

    #[test]
    fn test_nutrients_convert() {
        let n = nutrients(Some(89.0), Some(1.1), Some(22.8), Some(0.3), None, None).unwrap();
        assert_eq!(to_f64(n.protein), Some(1.1));
        assert!(n.fiber.is_none());
    }
}
