//! User repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

pub(crate) const ACCOUNT_COLUMNS: &str = r#"
    id, email, password_hash, username, age, gender, weight_kg, height_cm,
    blood_pressure, heart_rate, health_problems, profile_completed,
    saved_days_count, day_streak, last_logged_on, created_at, updated_at
"#;

/// Account record from the `users` table
#[derive(Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub username: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub weight_kg: Option<Decimal>,
    pub height_cm: Option<Decimal>,
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<i32>,
    pub health_problems: Vec<String>,
    pub profile_completed: bool,
    pub saved_days_count: i32,
    pub day_streak: i32,
    pub last_logged_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// A fresh account with only credentials and username set
    pub fn new(email: String, password_hash: String, username: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            username,
            age: None,
            gender: None,
            weight_kg: None,
            height_cm: None,
            blood_pressure: None,
            heart_rate: None,
            health_problems: Vec::new(),
            profile_completed: false,
            saved_days_count: 0,
            day_streak: 0,
            last_logged_on: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("username", &self.username)
            .field("profile_completed", &self.profile_completed)
            .finish_non_exhaustive()
    }
}

/// Partial profile update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub username: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub weight_kg: Option<Decimal>,
    pub height_cm: Option<Decimal>,
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<i32>,
    pub health_problems: Option<Vec<String>>,
    pub profile_completed: Option<bool>,
}

pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Insert a new account; a duplicate email surfaces as a unique violation
    pub async fn insert(pool: &PgPool, account: &Account) -> Result<Account> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, username)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.username)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }

    /// Update profile fields
    pub async fn update(pool: &PgPool, id: Uuid, updates: UpdateAccount) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                weight_kg = COALESCE($5, weight_kg),
                height_cm = COALESCE($6, height_cm),
                blood_pressure = COALESCE($7, blood_pressure),
                heart_rate = COALESCE($8, heart_rate),
                health_problems = COALESCE($9, health_problems),
                profile_completed = COALESCE($10, profile_completed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .bind(updates.username)
        .bind(updates.age)
        .bind(updates.gender)
        .bind(updates.weight_kg)
        .bind(updates.height_cm)
        .bind(updates.blood_pressure)
        .bind(updates.heart_rate)
        .bind(updates.health_problems)
        .bind(updates.profile_completed)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Delete an account and, by cascade, everything it owns
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password_hash() {
        let account = Account::new(
            "alice@example.com".to_string(),
            "$argon2id$v=19$secret-material".to_string(),
            None,
        );
        let debug = format!("{:?}", account);

        assert!(debug.contains("alice@example.com"));
        assert!(!debug.contains("secret-material"));
    }

    #[test]
    fn test_new_account_starts_empty() {
        let account = Account::new("a@b.co".to_string(), "h".to_string(), Some("a".to_string()));
        assert_eq!(account.saved_days_count, 0);
        assert_eq!(account.day_streak, 0);
        assert!(!account.profile_completed);
        assert!(account.health_problems.is_empty());
    }
}
