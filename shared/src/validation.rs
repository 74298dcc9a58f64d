//! Input validation functions
//!
//! Validators return a [`FieldError`] naming the offending field so the
//! backend can surface a specific message for input problems.

use crate::errors::FieldError;
use chrono::NaiveDate;
use validator::ValidateEmail;

/// Default minimum password length for new accounts
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Upper bound on password length; argon2 input is not free
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Normalize an email for lookup and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FieldError::new("email", "Email cannot be empty"));
    }
    if email.len() > 255 {
        return Err(FieldError::new("email", "Email too long"));
    }
    if !email.validate_email() {
        return Err(FieldError::new("email", "Invalid email format"));
    }
    Ok(())
}

/// Validate password length against the configured minimum
///
/// Length is counted in characters, not bytes.
pub fn validate_password(password: &str, min_length: usize) -> Result<(), FieldError> {
    let len = password.chars().count();
    if len < min_length {
        return Err(FieldError::new(
            "password",
            format!("Password must be at least {} characters", min_length),
        ));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(FieldError::new("password", "Password too long"));
    }
    Ok(())
}

/// Validate age in years
pub fn validate_age(age: i32) -> Result<(), FieldError> {
    if !(1..=150).contains(&age) {
        return Err(FieldError::new("age", "Age must be between 1 and 150"));
    }
    Ok(())
}

/// Validate body weight (kg)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), FieldError> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err(FieldError::new("weight", "Weight must be a valid number"));
    }
    if weight_kg < 20.0 {
        return Err(FieldError::new("weight", "Weight must be at least 20 kg"));
    }
    if weight_kg > 500.0 {
        return Err(FieldError::new("weight", "Weight must be at most 500 kg"));
    }
    Ok(())
}

/// Validate height (cm)
/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), FieldError> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err(FieldError::new("height", "Height must be a valid number"));
    }
    if height_cm < 50.0 {
        return Err(FieldError::new("height", "Height must be at least 50 cm"));
    }
    if height_cm > 300.0 {
        return Err(FieldError::new("height", "Height must be at most 300 cm"));
    }
    Ok(())
}

/// Validate resting heart rate (bpm)
pub fn validate_heart_rate(bpm: i32) -> Result<(), FieldError> {
    if bpm < 20 {
        return Err(FieldError::new("heart_rate", "Heart rate too low"));
    }
    if bpm > 300 {
        return Err(FieldError::new("heart_rate", "Heart rate too high"));
    }
    Ok(())
}

/// Validate a blood pressure reading written as `systolic/diastolic`, e.g. `120/80`
pub fn validate_blood_pressure(reading: &str) -> Result<(), FieldError> {
    let invalid = || FieldError::new("blood_pressure", "Blood pressure must look like 120/80");

    let (systolic, diastolic) = reading.trim().split_once('/').ok_or_else(invalid)?;
    let systolic: u16 = systolic.trim().parse().map_err(|_| invalid())?;
    let diastolic: u16 = diastolic.trim().parse().map_err(|_| invalid())?;

    if !(50..=300).contains(&systolic) || !(30..=200).contains(&diastolic) {
        return Err(FieldError::new("blood_pressure", "Blood pressure out of range"));
    }
    if systolic <= diastolic {
        return Err(FieldError::new(
            "blood_pressure",
            "Systolic pressure must exceed diastolic pressure",
        ));
    }
    Ok(())
}

/// Largest amount a nutrient column (`NUMERIC(8, 2)`) can hold
pub const MAX_NUTRIENT_AMOUNT: f64 = 999_999.99;

/// Validate a nutrient or calorie amount
pub fn validate_nutrient_amount(field: &str, value: f64) -> Result<(), FieldError> {
    if value.is_nan() || value.is_infinite() {
        return Err(FieldError::new(field, "Must be a valid number"));
    }
    if value < 0.0 {
        return Err(FieldError::new(field, "Cannot be negative"));
    }
    if value > MAX_NUTRIENT_AMOUNT {
        return Err(FieldError::new(
            field,
            format!("Cannot exceed {}", MAX_NUTRIENT_AMOUNT),
        ));
    }
    Ok(())
}

/// Validate that an optional end date does not precede the start date
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), FieldError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(FieldError::new(
            "end_date",
            "End date cannot be before the effective date",
        )),
        _ => Ok(()),
    }
}
