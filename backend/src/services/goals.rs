//! Goals service

use super::{parse_id, to_decimal, to_f64};
use crate::error::ApiError;
use crate::repositories::{CreateGoal, GoalRecord, GoalRepository, UpdateGoal};
use sqlx::PgPool;
use uuid::Uuid;
use wellness_tracker_shared::validation::{validate_date_range, validate_weight_kg};
use wellness_tracker_shared::{CreateGoalRequest, FieldError, GoalResponse, UpdateGoalRequest};

pub struct GoalsService;

impl GoalsService {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateGoalRequest,
    ) -> Result<GoalResponse, ApiError> {
        validate_targets(
            req.goal_weight,
            req.goal_exercise_frequency,
            req.goal_exercise_minutes,
            req.goal_water_intake,
        )?;
        validate_date_range(req.effective_date, req.end_date)?;

        let goal = GoalRepository::create(
            pool,
            CreateGoal {
                user_id,
                goal_weight: to_decimal("goal_weight", req.goal_weight)?,
                goal_exercise_frequency: req.goal_exercise_frequency,
                goal_exercise_minutes: req.goal_exercise_minutes,
                goal_water_intake: req.goal_water_intake,
                effective_date: req.effective_date,
                end_date: req.end_date,
            },
        )
        .await?;

        Ok(to_response(goal))
    }

    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<GoalResponse>, ApiError> {
        let goals = GoalRepository::list(pool, user_id, active_only).await?;
        Ok(goals.into_iter().map(to_response).collect())
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, id: &str) -> Result<GoalResponse, ApiError> {
        let id = parse_id(id, "goal")?;
        GoalRepository::find(pool, user_id, id)
            .await?
            .map(to_response)
            .ok_or_else(not_found)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: &str,
        req: UpdateGoalRequest,
    ) -> Result<GoalResponse, ApiError> {
        let id = parse_id(id, "goal")?;
        validate_targets(
            req.goal_weight,
            req.goal_exercise_frequency,
            req.goal_exercise_minutes,
            req.goal_water_intake,
        )?;

        let existing = GoalRepository::find(pool, user_id, id)
            .await?
            .ok_or_else(not_found)?;
        validate_date_range(
            req.effective_date.or(existing.effective_date),
            req.end_date.or(existing.end_date),
        )?;

        let updates = UpdateGoal {
            goal_weight: to_decimal("goal_weight", req.goal_weight)?,
            goal_exercise_frequency: req.goal_exercise_frequency,
            goal_exercise_minutes: req.goal_exercise_minutes,
            goal_water_intake: req.goal_water_intake,
            effective_date: req.effective_date,
            end_date: req.end_date,
            is_active: req.is_active,
        };

        GoalRepository::update(pool, user_id, id, updates)
            .await?
            .map(to_response)
            .ok_or_else(not_found)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: &str) -> Result<(), ApiError> {
        let id = parse_id(id, "goal")?;
        if !GoalRepository::delete(pool, user_id, id).await? {
            return Err(not_found());
        }
        Ok(())
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Goal not found".to_string())
}

fn validate_targets(
    weight: Option<f64>,
    frequency: Option<i32>,
    minutes: Option<i32>,
    water_ml: Option<i32>,
) -> Result<(), FieldError> {
    if let Some(weight) = weight {
        validate_weight_kg(weight).map_err(|e| FieldError::new("goal_weight", e.message))?;
    }
    if frequency.is_some_and(|f| !(0..=7).contains(&f)) {
        return Err(FieldError::new(
            "goal_exercise_frequency",
            "Exercise frequency must be between 0 and 7 days per week",
        ));
    }
    if minutes.is_some_and(|m| m < 0) {
        return Err(FieldError::new("goal_exercise_minutes", "Cannot be negative"));
    }
    if water_ml.is_some_and(|w| w < 0) {
        return Err(FieldError::new("goal_water_intake", "Cannot be negative"));
    }
    Ok(())
}

fn to_response(goal: GoalRecord) -> GoalResponse {
    GoalResponse {
        id: goal.id.to_string(),
        goal_weight: to_f64(goal.goal_weight),
        goal_exercise_frequency: goal.goal_exercise_frequency,
        goal_exercise_minutes: goal.goal_exercise_minutes,
        goal_water_intake: goal.goal_water_intake,
        effective_date: goal.effective_date,
        end_date: goal.end_date,
        is_active: goal.is_active,
        created_at: goal.created_at,
        updated_at: goal.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(70.0), Some(3), Some(30), Some(2000), true)]
    #[case(None, None, None, None, true)]
    #[case(Some(5.0), None, None, None, false)]
    #[case(None, Some(8), None, None, false)]
    #[case(None, None, Some(-1), None, false)]
    #[case(None, None, None, Some(-250), false)]
    fn test_validate_targets(
        #[case] weight: Option<f64>,
        #[case] frequency: Option<i32>,
        #[case] minutes: Option<i32>,
        #[case] water: Option<i32>,
        #[case] valid: bool,
    ) {
        assert_eq!(validate_targets(weight, frequency, minutes, water).is_ok(), valid);
    }

    #[test]
    fn test_weight_error_names_goal_field() {
        let err = validate_targets(Some(1.0), None, None, None).unwrap_err();
        assert_eq!(err.field, "goal_weight");
    }
}
