//! User preferences (at most one row per user)

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const PREFERENCES_COLUMNS: &str =
    "id, user_id, theme, notifications_enabled, reminder_times, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PreferencesRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub theme: String,
    pub notifications_enabled: bool,
    pub reminder_times: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePreferences {
    pub theme: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub reminder_times: Option<String>,
}

pub struct PreferencesRepository;

impl PreferencesRepository {
    /// Insert the user's preferences; a second row is a unique violation
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        theme: &str,
        notifications_enabled: bool,
        reminder_times: Option<String>,
    ) -> Result<PreferencesRecord> {
        let prefs = sqlx::query_as::<_, PreferencesRecord>(&format!(
            r#"
            INSERT INTO user_preferences (user_id, theme, notifications_enabled, reminder_times)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PREFERENCES_COLUMNS
        ))
        .bind(user_id)
        .bind(theme)
        .bind(notifications_enabled)
        .bind(reminder_times)
        .fetch_one(pool)
        .await?;

        Ok(prefs)
    }

    pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<PreferencesRecord>> {
        let prefs = sqlx::query_as::<_, PreferencesRecord>(&format!(
            "SELECT {} FROM user_preferences WHERE user_id = $1",
            PREFERENCES_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(prefs)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        updates: UpdatePreferences,
    ) -> Result<Option<PreferencesRecord>> {
        let prefs = sqlx::query_as::<_, PreferencesRecord>(&format!(
            r#"
            UPDATE user_preferences SET
                theme = COALESCE($2, theme),
                notifications_enabled = COALESCE($3, notifications_enabled),
                reminder_times = COALESCE($4, reminder_times),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {}
            "#,
            PREFERENCES_COLUMNS
        ))
        .bind(user_id)
        .bind(updates.theme)
        .bind(updates.notifications_enabled)
        .bind(updates.reminder_times)
        .fetch_optional(pool)
        .await?;

        Ok(prefs)
    }
}
