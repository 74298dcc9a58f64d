//! Application statistics (a single row)

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const STATISTICS_COLUMNS: &str =
    "id, total_users, total_meals_logged, total_days_tracked, api_calls_this_month, last_updated";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatisticsRecord {
    pub id: Uuid,
    pub total_users: i32,
    pub total_meals_logged: i32,
    pub total_days_tracked: i32,
    pub api_calls_this_month: i32,
    pub last_updated: DateTime<Utc>,
}

/// Absolute counter values; `None` leaves a counter as it is
#[derive(Debug, Clone, Default)]
pub struct SetStatistics {
    pub total_users: Option<i32>,
    pub total_meals_logged: Option<i32>,
    pub total_days_tracked: Option<i32>,
    pub api_calls_this_month: Option<i32>,
}

pub struct StatisticsRepository;

impl StatisticsRepository {
    pub async fn get(pool: &PgPool) -> Result<Option<StatisticsRecord>> {
        let stats = sqlx::query_as::<_, StatisticsRecord>(&format!(
            "SELECT {} FROM app_statistics WHERE singleton",
            STATISTICS_COLUMNS
        ))
        .fetch_optional(pool)
        .await?;

        Ok(stats)
    }

    /// Overwrite the given counters, creating the row if needed
    pub async fn upsert(pool: &PgPool, values: SetStatistics) -> Result<StatisticsRecord> {
        let stats = sqlx::query_as::<_, StatisticsRecord>(&format!(
            r#"
            INSERT INTO app_statistics (
                total_users, total_meals_logged, total_days_tracked, api_calls_this_month
            )
            VALUES (COALESCE($1, 0), COALESCE($2, 0), COALESCE($3, 0), COALESCE($4, 0))
            ON CONFLICT (singleton) DO UPDATE SET
                total_users = COALESCE($1, app_statistics.total_users),
                total_meals_logged = COALESCE($2, app_statistics.total_meals_logged),
                total_days_tracked = COALESCE($3, app_statistics.total_days_tracked),
                api_calls_this_month = COALESCE($4, app_statistics.api_calls_this_month),
                last_updated = NOW()
            RETURNING {}
            "#,
            STATISTICS_COLUMNS
        ))
        .bind(values.total_users)
        .bind(values.total_meals_logged)
        .bind(values.total_days_tracked)
        .bind(values.api_calls_this_month)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }

    /// Add to the meal and day counters inside a caller's transaction
    pub async fn bump(conn: &mut PgConnection, meals: i32, days: i32) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO app_statistics (total_meals_logged, total_days_tracked)
            VALUES (GREATEST($1, 0), GREATEST($2, 0))
            ON CONFLICT (singleton) DO UPDATE SET
                total_meals_logged = GREATEST(app_statistics.total_meals_logged + $1, 0),
                total_days_tracked = GREATEST(app_statistics.total_days_tracked + $2, 0),
                last_updated = NOW()
            "#,
        )
        .bind(meals)
        .bind(days)
        .execute(conn)
        .await?;

        Ok(())
    }
}
