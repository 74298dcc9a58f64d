//! Food log and meal repositories
//!
//! A food log is one row per user and day. Meals hang off a food log and
//! keep its `meal_count` in step; every multi-row change runs in one
//! transaction.

use super::statistics::StatisticsRepository;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

// ============================================================================
// Food logs
// ============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: NaiveDate,
    pub meal_count: i32,
}

/// Result of opening a day's food log
#[derive(Debug, Clone)]
pub struct OpenedFoodLog {
    pub log: FoodLogRecord,
    /// True when this call created the log
    pub created: bool,
}

/// Streak after logging `logged`, given the previous last logged day
///
/// Consecutive days extend the streak, a gap restarts it at 1, and
/// back-filling an earlier day leaves it alone.
pub fn next_day_streak(last_logged_on: Option<NaiveDate>, streak: i32, logged: NaiveDate) -> i32 {
    match last_logged_on {
        None => 1,
        Some(last) if logged <= last => streak,
        Some(last) if (logged - last).num_days() == 1 => streak + 1,
        Some(_) => 1,
    }
}

pub struct FoodLogRepository;

impl FoodLogRepository {
    /// Get the user's log for a date, creating it if absent
    ///
    /// A newly created log also counts the day on the user and in the
    /// application statistics.
    pub async fn open(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<OpenedFoodLog> {
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query_as::<_, FoodLogRecord>(
            r#"
            INSERT INTO food_logs (user_id, log_date)
            VALUES ($1, $2)
            ON CONFLICT (user_id, log_date) DO NOTHING
            RETURNING id, user_id, log_date, meal_count
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(log) = inserted else {
            let existing = sqlx::query_as::<_, FoodLogRecord>(
                r#"
                SELECT id, user_id, log_date, meal_count
                FROM food_logs
                WHERE user_id = $1 AND log_date = $2
                "#,
            )
            .bind(user_id)
            .bind(date)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;
            return Ok(OpenedFoodLog {
                log: existing,
                created: false,
            });
        };

        let (last_logged_on, streak): (Option<NaiveDate>, i32) = sqlx::query_as(
            "SELECT last_logged_on, day_streak FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users SET
                saved_days_count = saved_days_count + 1,
                day_streak = $2,
                last_logged_on = GREATEST(last_logged_on, $3),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(next_day_streak(last_logged_on, streak, date))
        .bind(date)
        .execute(&mut *tx)
        .await?;

        StatisticsRepository::bump(&mut *tx, 0, 1).await?;

        tx.commit().await?;

        Ok(OpenedFoodLog { log, created: true })
    }

    pub async fn find(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<FoodLogRecord>> {
        let log = sqlx::query_as::<_, FoodLogRecord>(
            r#"
            SELECT id, user_id, log_date, meal_count
            FROM food_logs
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(log)
    }

    pub async fn find_by_date(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<FoodLogRecord>> {
        let log = sqlx::query_as::<_, FoodLogRecord>(
            r#"
            SELECT id, user_id, log_date, meal_count
            FROM food_logs
            WHERE user_id = $1 AND log_date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;

        Ok(log)
    }

    /// Most recent days first
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<FoodLogRecord>> {
        let logs = sqlx::query_as::<_, FoodLogRecord>(
            r#"
            SELECT id, user_id, log_date, meal_count
            FROM food_logs
            WHERE user_id = $1
            ORDER BY log_date DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(logs)
    }
}

// ============================================================================
// Meals
// ============================================================================

const MEAL_COLUMNS: &str =
    "id, food_log_id, user_id, food_name, meal_type, calories, image_url, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealRecord {
    pub id: Uuid,
    pub food_log_id: Uuid,
    pub user_id: Uuid,
    pub food_name: Option<String>,
    pub meal_type: Option<String>,
    pub calories: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateMeal {
    pub user_id: Uuid,
    pub food_log_id: Uuid,
    pub food_name: Option<String>,
    pub meal_type: Option<String>,
    pub calories: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMeal {
    pub food_name: Option<String>,
    pub meal_type: Option<String>,
    pub calories: Option<i32>,
    pub image_url: Option<String>,
}

pub struct MealRepository;

impl MealRepository {
    /// Add a meal to one of the user's food logs
    ///
    /// Returns `None` when the food log does not belong to the user.
    pub async fn create(pool: &PgPool, input: CreateMeal) -> Result<Option<MealRecord>> {
        let mut tx = pool.begin().await?;

        let owned = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM food_logs WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(input.food_log_id)
        .bind(input.user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if owned.is_none() {
            return Ok(None);
        }

        let meal = sqlx::query_as::<_, MealRecord>(&format!(
            r#"
            INSERT INTO meals (food_log_id, user_id, food_name, meal_type, calories, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MEAL_COLUMNS
        ))
        .bind(input.food_log_id)
        .bind(input.user_id)
        .bind(input.food_name)
        .bind(input.meal_type)
        .bind(input.calories)
        .bind(input.image_url)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE food_logs SET meal_count = meal_count + 1 WHERE id = $1")
            .bind(input.food_log_id)
            .execute(&mut *tx)
            .await?;

        StatisticsRepository::bump(&mut *tx, 1, 0).await?;

        tx.commit().await?;

        Ok(Some(meal))
    }

    /// The user's meals, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MealRecord>> {
        let meals = sqlx::query_as::<_, MealRecord>(&format!(
            r#"
            SELECT {}
            FROM meals
            WHERE user_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
            MEAL_COLUMNS
        ))
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(meals)
    }

    pub async fn list_for_food_log(
        pool: &PgPool,
        user_id: Uuid,
        food_log_id: Uuid,
    ) -> Result<Vec<MealRecord>> {
        let meals = sqlx::query_as::<_, MealRecord>(&format!(
            r#"
            SELECT {}
            FROM meals
            WHERE food_log_id = $1 AND user_id = $2
            ORDER BY created_at
            "#,
            MEAL_COLUMNS
        ))
        .bind(food_log_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(meals)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        updates: UpdateMeal,
    ) -> Result<Option<MealRecord>> {
        let meal = sqlx::query_as::<_, MealRecord>(&format!(
            r#"
            UPDATE meals SET
                food_name = COALESCE($3, food_name),
                meal_type = COALESCE($4, meal_type),
                calories = COALESCE($5, calories),
                image_url = COALESCE($6, image_url),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            MEAL_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(updates.food_name)
        .bind(updates.meal_type)
        .bind(updates.calories)
        .bind(updates.image_url)
        .fetch_optional(pool)
        .await?;

        Ok(meal)
    }

    /// Delete a meal and decrement its food log's count, never below zero
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut tx = pool.begin().await?;

        let food_log_id = sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM meals WHERE id = $1 AND user_id = $2 RETURNING food_log_id",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(food_log_id) = food_log_id else {
            return Ok(false);
        };

        sqlx::query("UPDATE food_logs SET meal_count = GREATEST(meal_count - 1, 0) WHERE id = $1")
            .bind(food_log_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[rstest]
    #[case(None, 0, day(10), 1)]
    #[case(Some(day(9)), 4, day(10), 5)]
    #[case(Some(day(7)), 4, day(10), 1)]
    #[case(Some(day(10)), 4, day(10), 4)]
    #[case(Some(day(12)), 4, day(10), 4)]
    fn test_next_day_streak(
        #[case] last: Option<NaiveDate>,
        #[case] streak: i32,
        #[case] logged: NaiveDate,
        #[case] expected: i32,
    ) {
        assert_eq!(next_day_streak(last, streak, logged), expected);
    }

    #[test]
    fn test_streak_across_month_boundary() {
        let last = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(next_day_streak(Some(last), 2, day(1)), 3);
    }
}
