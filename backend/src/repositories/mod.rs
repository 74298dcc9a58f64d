//! Database repositories
//!
//! One unit struct per table family with async functions over a `PgPool`.
//! Every user-owned query filters on the owner, so a row belonging to
//! someone else looks exactly like a missing row.

pub mod achievements;
pub mod food;
pub mod goals;
pub mod nutrition;
pub mod preferences;
pub mod statistics;
pub mod tasks;
pub mod user;

pub use achievements::{
    AchievementRecord, AchievementRepository, CreateAchievement, ProgressUpdate, UpdateAchievement,
};
pub use food::{CreateMeal, FoodLogRecord, FoodLogRepository, MealRecord, MealRepository, UpdateMeal};
pub use goals::{CreateGoal, GoalRecord, GoalRepository, UpdateGoal};
pub use nutrition::{Nutrients, NutritionItemRecord, NutritionRepository};
pub use preferences::{PreferencesRecord, PreferencesRepository, UpdatePreferences};
pub use statistics::{SetStatistics, StatisticsRecord, StatisticsRepository};
pub use tasks::{CreateTask, DailyTaskRecord, DailyTaskRepository, TaskRecord, TaskRepository, UpdateTask};
pub use user::{Account, UpdateAccount, UserRepository};
