//! Application statistics service

use crate::error::ApiError;
use crate::repositories::{SetStatistics, StatisticsRecord, StatisticsRepository};
use sqlx::PgPool;
use wellness_tracker_shared::{FieldError, StatisticsResponse, UpdateStatisticsRequest};

pub struct StatisticsService;

impl StatisticsService {
    pub async fn get(pool: &PgPool) -> Result<StatisticsResponse, ApiError> {
        StatisticsRepository::get(pool)
            .await?
            .map(to_response)
            .ok_or_else(|| ApiError::NotFound("Statistics not found".to_string()))
    }

    /// Set the given counters, creating the statistics row on first use
    pub async fn update(
        pool: &PgPool,
        req: UpdateStatisticsRequest,
    ) -> Result<StatisticsResponse, ApiError> {
        let counters = [
            ("total_users", req.total_users),
            ("total_meals_logged", req.total_meals_logged),
            ("total_days_tracked", req.total_days_tracked),
            ("api_calls_this_month", req.api_calls_this_month),
        ];
        for (field, value) in counters {
            if value.is_some_and(|v| v < 0) {
                return Err(FieldError::new(field, "Cannot be negative").into());
            }
        }

        let stats = StatisticsRepository::upsert(
            pool,
            SetStatistics {
                total_users: req.total_users,
                total_meals_logged: req.total_meals_logged,
                total_days_tracked: req.total_days_tracked,
                api_calls_this_month: req.api_calls_this_month,
            },
        )
        .await?;

        Ok(to_response(stats))
    }
}

fn to_response(stats: StatisticsRecord) -> StatisticsResponse {
    StatisticsResponse {
        id: stats.id.to_string(),
        total_users: stats.total_users,
        total_meals_logged: stats.total_meals_logged,
        total_days_tracked: stats.total_days_tracked,
        api_calls_this_month: stats.api_calls_this_month,
        last_updated: stats.last_updated,
    }
}
