//! Daily task sheets and their tasks
//!
//! Tasks have no owner column; ownership is checked through the daily
//! task they belong to.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyTaskRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_date: NaiveDate,
}

const TASK_COLUMNS: &str = r#"
    t.id, t.daily_task_id, t.task_type, t.value_text, t.value_number, t.completed,
    t.task_quality, t.started_at, t.ended_at, t.created_at, t.updated_at
"#;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRecord {
    pub id: Uuid,
    pub daily_task_id: Uuid,
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

#[derive(Debug, Clone)]
pub struct CreateTask {
    pub daily_task_id: Uuid,
    pub task_type: Option<String>,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    pub completed: bool,
    pub task_quality: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub task_type: Option<String>,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    pub completed: Option<bool>,
    pub task_quality: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

pub struct DailyTaskRepository;

impl DailyTaskRepository {
    /// Get the user's sheet for a date, creating it if absent
    pub async fn open(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<DailyTaskRecord> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let record = sqlx::query_as::<_, DailyTaskRecord>(
            r#"
            INSERT INTO daily_tasks (user_id, task_date)
            VALUES ($1, $2)
            ON CONFLICT (user_id, task_date) DO UPDATE SET task_date = EXCLUDED.task_date
            RETURNING id, user_id, task_date
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn find(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<DailyTaskRecord>> {
        let record = sqlx::query_as::<_, DailyTaskRecord>(
            "SELECT id, user_id, task_date FROM daily_tasks WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_date(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DailyTaskRecord>> {
        let record = sqlx::query_as::<_, DailyTaskRecord>(
            "SELECT id, user_id, task_date FROM daily_tasks WHERE user_id = $1 AND task_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}

pub struct TaskRepository;

impl TaskRepository {
    /// Returns `None` when the daily task does not belong to the user
    pub async fn create(pool: &PgPool, user_id: Uuid, input: CreateTask) -> Result<Option<TaskRecord>> {
        let task = sqlx::query_as::<_, TaskRecord>(&format!(
            r#"
            WITH t AS (
                INSERT INTO tasks (
                    daily_task_id, task_type, value_text, value_number, completed,
                    task_quality, started_at, ended_at
                )
                SELECT d.id, $3, $4, $5, $6, $7, $8, $9
                FROM daily_tasks d
                WHERE d.id = $1 AND d.user_id = $2
                RETURNING *
            )
            SELECT {} FROM t
            "#,
            TASK_COLUMNS
        ))
        .bind(input.daily_task_id)
        .bind(user_id)
        .bind(input.task_type)
        .bind(input.value_text)
        .bind(input.value_number)
        .bind(input.completed)
        .bind(input.task_quality)
        .bind(input.started_at)
        .bind(input.ended_at)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    pub async fn list_for_daily_task(
        pool: &PgPool,
        user_id: Uuid,
        daily_task_id: Uuid,
    ) -> Result<Vec<TaskRecord>> {
        let tasks = sqlx::query_as::<_, TaskRecord>(&format!(
            r#"
            SELECT {}
            FROM tasks t
            JOIN daily_tasks d ON d.id = t.daily_task_id
            WHERE t.daily_task_id = $1 AND d.user_id = $2
            ORDER BY t.created_at
            "#,
            TASK_COLUMNS
        ))
        .bind(daily_task_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    pub async fn find(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<TaskRecord>> {
        let task = sqlx::query_as::<_, TaskRecord>(&format!(
            r#"
            SELECT {}
            FROM tasks t
            JOIN daily_tasks d ON d.id = t.daily_task_id
            WHERE t.id = $1 AND d.user_id = $2
            "#,
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        updates: UpdateTask,
    ) -> Result<Option<TaskRecord>> {
        let task = sqlx::query_as::<_, TaskRecord>(&format!(
            r#"
            UPDATE tasks t SET
                task_type = COALESCE($3, t.task_type),
                value_text = COALESCE($4, t.value_text),
                value_number = COALESCE($5, t.value_number),
                completed = COALESCE($6, t.completed),
                task_quality = COALESCE($7, t.task_quality),
                started_at = COALESCE($8, t.started_at),
                ended_at = COALESCE($9, t.ended_at),
                updated_at = NOW()
            FROM daily_tasks d
            WHERE t.id = $1 AND d.id = t.daily_task_id AND d.user_id = $2
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(updates.task_type)
        .bind(updates.value_text)
        .bind(updates.value_number)
        .bind(updates.completed)
        .bind(updates.task_quality)
        .bind(updates.started_at)
        .bind(updates.ended_at)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks t
            USING daily_tasks d
            WHERE t.id = $1 AND d.id = t.daily_task_id AND d.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
