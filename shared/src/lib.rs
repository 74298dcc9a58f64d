//! Wellness Tracker Shared Library
//!
//! Wire types, domain enums and input validation shared by the backend
//! and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Gender, MealType, Theme};
pub use types::*;
