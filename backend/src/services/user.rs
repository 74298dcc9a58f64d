//! Account profile service

use super::{to_decimal, to_f64};
use crate::error::ApiError;
use crate::repositories::{Account, UpdateAccount, UserRepository};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use wellness_tracker_shared::validation::{
    validate_age, validate_blood_pressure, validate_heart_rate, validate_height_cm,
    validate_weight_kg,
};
use wellness_tracker_shared::{Gender, UpdateUserRequest, UserProfile};

pub struct UserService;

impl UserService {
    /// Profile view of an account; the password hash never leaves here
    pub fn profile(account: Account) -> UserProfile {
        UserProfile {
            id: account.id.to_string(),
            email: account.email,
            username: account.username,
            age: account.age,
            gender: account.gender.as_deref().and_then(|g| g.parse::<Gender>().ok()),
            weight: to_f64(account.weight_kg),
            height: to_f64(account.height_cm),
            blood_pressure: account.blood_pressure,
            heart_rate: account.heart_rate,
            health_problems: account.health_problems,
            profile_completed: account.profile_completed,
            saved_days_count: account.saved_days_count,
            day_streak: account.day_streak,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }

    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<UserProfile, ApiError> {
        let updates = Self::validate_update(req)?;

        let account = UserRepository::update(pool, user_id, updates)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(Self::profile(account))
    }

    pub async fn delete_account(pool: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
        if !UserRepository::delete(pool, user_id).await? {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
        info!(user_id = %user_id, "Account deleted");
        Ok(())
    }

    fn validate_update(req: UpdateUserRequest) -> Result<UpdateAccount, ApiError> {
        if let Some(age) = req.age {
            validate_age(age)?;
        }
        if let Some(weight) = req.weight {
            validate_weight_kg(weight)?;
        }
        if let Some(height) = req.height {
            validate_height_cm(height)?;
        }
        if let Some(bp) = req.blood_pressure.as_deref() {
            validate_blood_pressure(bp)?;
        }
        if let Some(bpm) = req.heart_rate {
            validate_heart_rate(bpm)?;
        }
        if req
            .username
            .as_ref()
            .is_some_and(|u| u.trim().is_empty() || u.chars().count() > 100)
        {
            return Err(ApiError::Validation {
                message: "Username must be between 1 and 100 characters".to_string(),
                field: Some("username".to_string()),
            });
        }

        Ok(UpdateAccount {
            username: req.username.map(|u| u.trim().to_string()),
            age: req.age,
            gender: req.gender.map(|g| g.as_str().to_string()),
            weight_kg: to_decimal("weight", req.weight)?,
            height_cm: to_decimal("height", req.height)?,
            blood_pressure: req.blood_pressure.map(|bp| bp.trim().to_string()),
            heart_rate: req.heart_rate,
            health_problems: req.health_problems,
            profile_completed: req.profile_completed,
        })
    }
}
