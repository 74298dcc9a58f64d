//! Daily task and task service

use super::parse_id;
use crate::db::is_check_violation_any;
use crate::error::ApiError;
use crate::repositories::{
    CreateTask, DailyTaskRecord, DailyTaskRepository, TaskRecord, TaskRepository, UpdateTask,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wellness_tracker_shared::{
    CreateTaskRequest, DailyTaskResponse, FieldError, TaskResponse, UpdateTaskRequest,
};

pub struct TaskService;

impl TaskService {
    /// Open the task sheet for a date; repeated calls return the same sheet
    pub async fn open_daily_task(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailyTaskResponse, ApiError> {
        let record = DailyTaskRepository::open(pool, user_id, date).await?;
        Ok(daily_response(record))
    }

    pub async fn daily_task_by_date(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailyTaskResponse, ApiError> {
        DailyTaskRepository::find_by_date(pool, user_id, date)
            .await?
            .map(daily_response)
            .ok_or_else(daily_not_found)
    }

    pub async fn tasks_for_daily_task(
        pool: &PgPool,
        user_id: Uuid,
        daily_task_id: &str,
    ) -> Result<Vec<TaskResponse>, ApiError> {
        let daily_task_id = parse_id(daily_task_id, "daily task")?;
        if DailyTaskRepository::find(pool, user_id, daily_task_id)
            .await?
            .is_none()
        {
            return Err(daily_not_found());
        }

        let tasks = TaskRepository::list_for_daily_task(pool, user_id, daily_task_id).await?;
        Ok(tasks.into_iter().map(task_response).collect())
    }

    pub async fn create_task(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateTaskRequest,
    ) -> Result<TaskResponse, ApiError> {
        let daily_task_id = parse_id(&req.daily_task_id, "daily task")?;
        validate_interval(req.started_at, req.ended_at)?;

        let task = TaskRepository::create(
            pool,
            user_id,
            CreateTask {
                daily_task_id,
                task_type: req.task_type,
                value_text: req.value_text,
                value_number: req.value_number,
                completed: req.completed,
                task_quality: req.task_quality,
                started_at: req.started_at,
                ended_at: req.ended_at,
            },
        )
        .await?
        .ok_or_else(daily_not_found)?;

        Ok(task_response(task))
    }

    pub async fn update_task(
        pool: &PgPool,
        user_id: Uuid,
        id: &str,
        req: UpdateTaskRequest,
    ) -> Result<TaskResponse, ApiError> {
        let id = parse_id(id, "task")?;
        let existing = TaskRepository::find(pool, user_id, id)
            .await?
            .ok_or_else(task_not_found)?;
        validate_interval(
            req.started_at.or(existing.started_at),
            req.ended_at.or(existing.ended_at),
        )?;

        let updates = UpdateTask {
            task_type: req.task_type,
            value_text: req.value_text,
            value_number: req.value_number,
            completed: req.completed,
            task_quality: req.task_quality,
            started_at: req.started_at,
            ended_at: req.ended_at,
        };

        TaskRepository::update(pool, user_id, id, updates)
            .await
            .map_err(|e| {
                if is_check_violation_any(&e) {
                    ApiError::from(interval_error())
                } else {
                    ApiError::Internal(e)
                }
            })?
            .map(task_response)
            .ok_or_else(task_not_found)
    }

    pub async fn delete_task(pool: &PgPool, user_id: Uuid, id: &str) -> Result<(), ApiError> {
        let id = parse_id(id, "task")?;
        if !TaskRepository::delete(pool, user_id, id).await? {
            return Err(task_not_found());
        }
        Ok(())
    }
}

fn validate_interval(
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
) -> Result<(), FieldError> {
    match (started_at, ended_at) {
        (Some(start), Some(end)) if end < start => Err(interval_error()),
        _ => Ok(()),
    }
}

fn interval_error() -> FieldError {
    FieldError::new("ended_at", "End time cannot be before start time")
}

fn daily_not_found() -> ApiError {
    ApiError::NotFound("Daily task not found".to_string())
}

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

fn daily_response(record: DailyTaskRecord) -> DailyTaskResponse {
    DailyTaskResponse {
        id: record.id.to_string(),
        date: record.task_date,
    }
}

fn task_response(task: TaskRecord) -> TaskResponse {
    TaskResponse {
        id: task.id.to_string(),
        daily_task_id: task.daily_task_id.to_string(),
        task_type: task.task_type,
        value_text: task.value_text,
        value_number: task.value_number,
        completed: task.completed,
        task_quality: task.task_quality,
        started_at: task.started_at,
        ended_at: task.ended_at,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}
