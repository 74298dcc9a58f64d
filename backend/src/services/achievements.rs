//! Achievements service

use super::parse_id;
use crate::error::ApiError;
use crate::repositories::{
    AchievementRecord, AchievementRepository, CreateAchievement, UpdateAchievement,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use wellness_tracker_shared::{
    AchievementProgressRequest, AchievementResponse, CreateAchievementRequest, FieldError,
    UpdateAchievementRequest,
};

pub struct AchievementService;

impl AchievementService {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateAchievementRequest,
    ) -> Result<AchievementResponse, ApiError> {
        if req.target.is_some_and(|t| t <= 0) {
            return Err(FieldError::new("target", "Target must be positive").into());
        }
        let current = req.current.unwrap_or(0);
        if current < 0 {
            return Err(FieldError::new("current", "Cannot be negative").into());
        }

        let achievement = AchievementRepository::create(
            pool,
            CreateAchievement {
                user_id,
                achievement_type: req.achievement_type,
                name: req.name,
                description: req.description,
                target: req.target,
                current,
            },
        )
        .await?;

        Ok(to_response(achievement))
    }

    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        achievement_type: Option<&str>,
    ) -> Result<Vec<AchievementResponse>, ApiError> {
        let achievements = AchievementRepository::list(pool, user_id, achievement_type).await?;
        Ok(achievements.into_iter().map(to_response).collect())
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: &str,
        req: UpdateAchievementRequest,
    ) -> Result<AchievementResponse, ApiError> {
        let id = parse_id(id, "achievement")?;
        if req.current.is_some_and(|c| c < 0) {
            return Err(FieldError::new("current", "Cannot be negative").into());
        }

        let updates = UpdateAchievement {
            current: req.current,
            achieved: req.achieved,
            achieved_at: req.achieved_at,
        };

        AchievementRepository::update(pool, user_id, id, updates)
            .await?
            .map(to_response)
            .ok_or_else(not_found)
    }

    /// Increment progress, marking the achievement when its target is met
    pub async fn add_progress(
        pool: &PgPool,
        user_id: Uuid,
        id: &str,
        req: AchievementProgressRequest,
    ) -> Result<AchievementResponse, ApiError> {
        let id = parse_id(id, "achievement")?;
        let amount = req.amount.unwrap_or(1);
        if amount <= 0 {
            return Err(FieldError::new("amount", "Amount must be positive").into());
        }

        let update = AchievementRepository::add_progress(pool, user_id, id, amount)
            .await?
            .ok_or_else(not_found)?;

        if update.unlocked {
            info!(user_id = %user_id, achievement_id = %update.achievement.id, "Achievement unlocked");
        }

        Ok(to_response(update.achievement))
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: &str) -> Result<(), ApiError> {
        let id = parse_id(id, "achievement")?;
        if !AchievementRepository::delete(pool, user_id, id).await? {
            return Err(not_found());
        }
        Ok(())
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Achievement not found".to_string())
}

fn to_response(achievement: AchievementRecord) -> AchievementResponse {
    AchievementResponse {
        id: achievement.id.to_string(),
        achievement_type: achievement.achievement_type,
        name: achievement.name,
        description: achievement.description,
        target: achievement.target,
        current: achievement.current,
        achieved: achievement.achieved,
        achieved_at: achievement.achieved_at,
        created_at: achievement.created_at,
        updated_at: achievement.updated_at,
    }
}
