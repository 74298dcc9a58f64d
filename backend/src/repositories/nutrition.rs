//! Nutrition lookup table
//!
//! Shared across users: entries are not owned by anyone.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const NUTRITION_COLUMNS: &str =
    "id, food_name, calories, protein, carbs, fat, fiber, sugar, last_updated";

/// Search results are capped at this many rows
pub const SEARCH_LIMIT: i64 = 50;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NutritionItemRecord {
    pub id: Uuid,
    pub food_name: String,
    pub calories: Option<Decimal>,
    pub protein: Option<Decimal>,
    pub carbs: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub fiber: Option<Decimal>,
    pub sugar: Option<Decimal>,
    pub last_updated: DateTime<Utc>,
}

/// Nutrient values per serving
#[derive(Debug, Clone, Default)]
pub struct Nutrients {
    pub calories: Option<Decimal>,
    pub protein: Option<Decimal>,
    pub carbs: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub fiber: Option<Decimal>,
    pub sugar: Option<Decimal>,
}

pub struct NutritionRepository;

impl NutritionRepository {
    /// Insert an entry; a duplicate food name surfaces as a unique violation
    pub async fn create(
        pool: &PgPool,
        food_name: &str,
        nutrients: Nutrients,
    ) -> Result<NutritionItemRecord> {
        let item = sqlx::query_as::<_, NutritionItemRecord>(&format!(
            r#"
            INSERT INTO nutrition_items (food_name, calories, protein, carbs, fat, fiber, sugar)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            NUTRITION_COLUMNS
        ))
        .bind(food_name)
        .bind(nutrients.calories)
        .bind(nutrients.protein)
        .bind(nutrients.carbs)
        .bind(nutrients.fat)
        .bind(nutrients.fiber)
        .bind(nutrients.sugar)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Case-insensitive substring match on the food name
    pub async fn search(pool: &PgPool, query: &str) -> Result<Vec<NutritionItemRecord>> {
        let pattern = format!("%{}%", escape_like(query));

        let items = sqlx::query_as::<_, NutritionItemRecord>(&format!(
            r#"
            SELECT {}
            FROM nutrition_items
            WHERE food_name ILIKE $1 ESCAPE '\'
            ORDER BY food_name
            LIMIT $2
            "#,
            NUTRITION_COLUMNS
        ))
        .bind(pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<NutritionItemRecord>> {
        let item = sqlx::query_as::<_, NutritionItemRecord>(&format!(
            "SELECT {} FROM nutrition_items WHERE id = $1",
            NUTRITION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        food_name: Option<&str>,
        nutrients: Nutrients,
    ) -> Result<Option<NutritionItemRecord>> {
        let item = sqlx::query_as::<_, NutritionItemRecord>(&format!(
            r#"
            UPDATE nutrition_items SET
                food_name = COALESCE($2, food_name),
                calories = COALESCE($3, calories),
                protein = COALESCE($4, protein),
                carbs = COALESCE($5, carbs),
                fat = COALESCE($6, fat),
                fiber = COALESCE($7, fiber),
                sugar = COALESCE($8, sugar),
                last_updated = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            NUTRITION_COLUMNS
        ))
        .bind(id)
        .bind(food_name)
        .bind(nutrients.calories)
        .bind(nutrients.protein)
        .bind(nutrients.carbs)
        .bind(nutrients.fat)
        .bind(nutrients.fiber)
        .bind(nutrients.sugar)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
