//! Achievements repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const ACHIEVEMENT_COLUMNS: &str = r#"
    id, user_id, achievement_type, name, description, target, current,
    achieved, achieved_at, created_at, updated_at
"#;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AchievementRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub achievement_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: Option<i32>,
    pub current: i32,
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAchievement {
    pub user_id: Uuid,
    pub achievement_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: Option<i32>,
    pub current: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAchievement {
    pub current: Option<i32>,
    pub achieved: Option<bool>,
    pub achieved_at: Option<DateTime<Utc>>,
}

/// Progress state after an increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: i32,
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
}

/// Result of a progress increment
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub achievement: AchievementRecord,
    /// True only for the increment that first marks the achievement
    pub unlocked: bool,
}

impl Progress {
    fn of(achievement: &AchievementRecord) -> Self {
        Self {
            current: achievement.current,
            achieved: achievement.achieved,
            achieved_at: achievement.achieved_at,
        }
    }

    /// Whether moving from `before` to `self` marked the achievement
    pub fn unlocks(&self, before: &Progress) -> bool {
        self.achieved && !before.achieved
    }

    /// Add `amount` and mark the achievement once `current` reaches `target`
    ///
    /// An achievement never becomes unachieved, and its first
    /// `achieved_at` is kept.
    pub fn advance(self, target: Option<i32>, amount: i32, now: DateTime<Utc>) -> Self {
        let current = self.current.saturating_add(amount);
        let reached = target.is_some_and(|t| current >= t);

        if self.achieved || !reached {
            return Self { current, ..self };
        }

        Self {
            current,
            achieved: true,
            achieved_at: Some(now),
        }
    }
}

pub struct AchievementRepository;

impl AchievementRepository {
    pub async fn create(pool: &PgPool, input: CreateAchievement) -> Result<AchievementRecord> {
        let achievement = sqlx::query_as::<_, AchievementRecord>(&format!(
            r#"
            INSERT INTO achievements (user_id, achievement_type, name, description, target, current)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ACHIEVEMENT_COLUMNS
        ))
        .bind(input.user_id)
        .bind(input.achievement_type)
        .bind(input.name)
        .bind(input.description)
        .bind(input.target)
        .bind(input.current)
        .fetch_one(pool)
        .await?;

        Ok(achievement)
    }

    /// Oldest first, optionally restricted to one type
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        achievement_type: Option<&str>,
    ) -> Result<Vec<AchievementRecord>> {
        let achievements = sqlx::query_as::<_, AchievementRecord>(&format!(
            r#"
            SELECT {}
            FROM achievements
            WHERE user_id = $1 AND ($2::text IS NULL OR achievement_type = $2)
            ORDER BY created_at
            "#,
            ACHIEVEMENT_COLUMNS
        ))
        .bind(user_id)
        .bind(achievement_type)
        .fetch_all(pool)
        .await?;

        Ok(achievements)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        updates: UpdateAchievement,
    ) -> Result<Option<AchievementRecord>> {
        let achievement = sqlx::query_as::<_, AchievementRecord>(&format!(
            r#"
            UPDATE achievements SET
                current = COALESCE($3, current),
                achieved = COALESCE($4, achieved),
                achieved_at = CASE
                    WHEN $4::boolean = FALSE THEN NULL
                    WHEN $4::boolean = TRUE THEN COALESCE($5, achieved_at, NOW())
                    ELSE COALESCE($5, achieved_at)
                END,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            ACHIEVEMENT_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(updates.current)
        .bind(updates.achieved)
        .bind(updates.achieved_at)
        .fetch_optional(pool)
        .await?;

        Ok(achievement)
    }

    /// Apply a progress increment under a row lock
    pub async fn add_progress(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        amount: i32,
    ) -> Result<Option<ProgressUpdate>> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_as::<_, AchievementRecord>(&format!(
            "SELECT {} FROM achievements WHERE id = $1 AND user_id = $2 FOR UPDATE",
            ACHIEVEMENT_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let before = Progress::of(&existing);
        let progress = before.advance(existing.target, amount, Utc::now());

        let achievement = sqlx::query_as::<_, AchievementRecord>(&format!(
            r#"
            UPDATE achievements SET
                current = $2,
                achieved = $3,
                achieved_at = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ACHIEVEMENT_COLUMNS
        ))
        .bind(id)
        .bind(progress.current)
        .bind(progress.achieved)
        .bind(progress.achieved_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(ProgressUpdate {
            achievement,
            unlocked: progress.unlocks(&before),
        }))
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM achievements WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
