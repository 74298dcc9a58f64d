//! User preferences service

use crate::db::is_unique_violation_any;
use crate::error::ApiError;
use crate::repositories::{PreferencesRecord, PreferencesRepository, UpdatePreferences};
use sqlx::PgPool;
use uuid::Uuid;
use wellness_tracker_shared::{
    CreatePreferencesRequest, PreferencesResponse, Theme, UpdatePreferencesRequest,
};

pub struct PreferencesService;

impl PreferencesService {
    /// Create the user's preferences; a second call is a conflict
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreatePreferencesRequest,
    ) -> Result<PreferencesResponse, ApiError> {
        let prefs = PreferencesRepository::create(
            pool,
            user_id,
            req.theme.as_str(),
            req.notifications_enabled,
            req.reminder_times,
        )
        .await
        .map_err(|e| {
            if is_unique_violation_any(&e) {
                ApiError::Conflict("Preferences already exist".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        Ok(to_response(prefs))
    }

    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<PreferencesResponse, ApiError> {
        PreferencesRepository::find(pool, user_id)
            .await?
            .map(to_response)
            .ok_or_else(not_found)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdatePreferencesRequest,
    ) -> Result<PreferencesResponse, ApiError> {
        let updates = UpdatePreferences {
            theme: req.theme.map(|t| t.as_str().to_string()),
            notifications_enabled: req.notifications_enabled,
            reminder_times: req.reminder_times,
        };

        PreferencesRepository::update(pool, user_id, updates)
            .await?
            .map(to_response)
            .ok_or_else(not_found)
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Preferences not found".to_string())
}

fn to_response(prefs: PreferencesRecord) -> PreferencesResponse {
    PreferencesResponse {
        id: prefs.id.to_string(),
        theme: prefs.theme.parse::<Theme>().unwrap_or_default(),
        notifications_enabled: prefs.notifications_enabled,
        reminder_times: prefs.reminder_times,
        created_at: prefs.created_at,
        updated_at: prefs.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_unknown_theme_falls_back_to_system() {
        let prefs = PreferencesRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            theme: "sepia".to_string(),
            notifications_enabled: true,
            reminder_times: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(to_response(prefs).theme, Theme::System);
    }
}
