//! Business logic services
//!
//! Services validate input, call the repositories and shape the shared
//! response types. Failures are reported as [`ApiError`].

pub mod achievements;
pub mod auth;
pub mod food;
pub mod goals;
pub mod nutrition;
pub mod preferences;
pub mod statistics;
pub mod tasks;
pub mod user;

pub use achievements::AchievementService;
pub use auth::AuthService;
pub use food::FoodService;
pub use goals::GoalsService;
pub use nutrition::NutritionService;
pub use preferences::PreferencesService;
pub use statistics::StatisticsService;
pub use tasks::TaskService;
pub use user::UserService;

use crate::error::ApiError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Parse a path or body id
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::validation(format!("Invalid {} ID", what)))
}

pub(crate) fn to_decimal(field: &str, value: Option<f64>) -> Result<Option<Decimal>, ApiError> {
    value
        .map(|v| {
            Decimal::try_from(v)
                .map_err(|_| ApiError::validation(format!("{} must be a valid number", field)))
        })
        .transpose()
}

pub(crate) fn to_f64(value: Option<Decimal>) -> Option<f64> {
    value.and_then(|d| d.to_f64())
}
