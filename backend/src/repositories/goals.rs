//! Goals repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const GOAL_COLUMNS: &str = r#"
    id, user_id, goal_weight, goal_exercise_frequency, goal_exercise_minutes,
    goal_water_intake, effective_date, end_date, is_active, created_at, updated_at
"#;

/// Goal record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_weight: Option<Decimal>,
    pub goal_exercise_frequency: Option<i32>,
    pub goal_exercise_minutes: Option<i32>,
    pub goal_water_intake: Option<i32>,
    pub effective_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct CreateGoal {
    pub user_id: Uuid,
    pub goal_weight: Option<Decimal>,
    pub goal_exercise_frequency: Option<i32>,
    pub goal_exercise_minutes: Option<i32>,
    pub goal_water_intake: Option<i32>,
    pub effective_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Input for updating a goal
#[derive(Debug, Clone, Default)]
pub struct UpdateGoal {
    pub goal_weight: Option<Decimal>,
    pub goal_exercise_frequency: Option<i32>,
    pub goal_exercise_minutes: Option<i32>,
    pub goal_water_intake: Option<i32>,
    pub effective_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

pub struct GoalRepository;

impl GoalRepository {
    pub async fn create(pool: &PgPool, input: CreateGoal) -> Result<GoalRecord> {
        let goal = sqlx::query_as::<_, GoalRecord>(&format!(
            r#"
            INSERT INTO user_goals (
                user_id, goal_weight, goal_exercise_frequency, goal_exercise_minutes,
                goal_water_intake, effective_date, end_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            GOAL_COLUMNS
        ))
        .bind(input.user_id)
        .bind(input.goal_weight)
        .bind(input.goal_exercise_frequency)
        .bind(input.goal_exercise_minutes)
        .bind(input.goal_water_intake)
        .bind(input.effective_date)
        .bind(input.end_date)
        .fetch_one(pool)
        .await?;

        Ok(goal)
    }

    /// Goals owned by a user, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid, active_only: bool) -> Result<Vec<GoalRecord>> {
        let goals = sqlx::query_as::<_, GoalRecord>(&format!(
            r#"
            SELECT {}
            FROM user_goals
            WHERE user_id = $1 AND ($2 = FALSE OR is_active = TRUE)
            ORDER BY created_at DESC
            "#,
            GOAL_COLUMNS
        ))
        .bind(user_id)
        .bind(active_only)
        .fetch_all(pool)
        .await?;

        Ok(goals)
    }

    pub async fn find(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<GoalRecord>> {
        let goal = sqlx::query_as::<_, GoalRecord>(&format!(
            "SELECT {} FROM user_goals WHERE id = $1 AND user_id = $2",
            GOAL_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(goal)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        updates: UpdateGoal,
    ) -> Result<Option<GoalRecord>> {
        let goal = sqlx::query_as::<_, GoalRecord>(&format!(
            r#"
            UPDATE user_goals SET
                goal_weight = COALESCE($3, goal_weight),
                goal_exercise_frequency = COALESCE($4, goal_exercise_frequency),
                goal_exercise_minutes = COALESCE($5, goal_exercise_minutes),
                goal_water_intake = COALESCE($6, goal_water_intake),
                effective_date = COALESCE($7, effective_date),
                end_date = COALESCE($8, end_date),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            GOAL_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(updates.goal_weight)
        .bind(updates.goal_exercise_frequency)
        .bind(updates.goal_exercise_minutes)
        .bind(updates.goal_water_intake)
        .bind(updates.effective_date)
        .bind(updates.end_date)
        .bind(updates.is_active)
        .fetch_optional(pool)
        .await?;

        Ok(goal)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
