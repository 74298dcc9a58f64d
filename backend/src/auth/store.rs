//! Credential storage
//!
//! [`CredentialStore`] is the only way the auth flow touches accounts.
//! Uniqueness of email is enforced atomically by the backing store: the
//! database constraint for [`PgCredentialStore`], a single write lock for
//! [`MemoryCredentialStore`].

use crate::db::is_unique_violation_any;
use crate::repositories::user::{Account, UserRepository};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;
use wellness_tracker_shared::validation::normalize_email;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Fields supplied when an account is created
#[derive(Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub username: Option<String>,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;
}

/// PostgreSQL-backed store over the `users` table
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(UserRepository::find_by_email(&self.pool, &normalize_email(email)).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(UserRepository::find_by_id(&self.pool, id).await?)
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let account = Account::new(
            normalize_email(&account.email),
            account.password_hash,
            account.username,
        );

        UserRepository::insert(&self.pool, &account)
            .await
            .map_err(|e| {
                if is_unique_violation_any(&e) {
                    StoreError::DuplicateEmail
                } else {
                    StoreError::Backend(e)
                }
            })
    }
}

/// In-process store for tests and database-less runs
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop an account, as if it had been deleted elsewhere
    pub async fn remove(&self, id: Uuid) -> Option<Account> {
        self.accounts.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let email = normalize_email(email);
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let email = normalize_email(&account.email);
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let account = Account::new(email, account.password_hash, account.username);
        accounts.insert(account.id, account.clone());
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            username: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryCredentialStore::new();
        let created = store.create(new_account("alice@example.com")).await.unwrap();

        let by_email = store.find_by_email("alice@example.com").await.unwrap().unwrap();
        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(by_email.id, created.id);
        assert_eq!(by_id.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_email_is_normalized() {
        let store = MemoryCredentialStore::new();
        store.create(new_account("  Alice@Example.COM ")).await.unwrap();

        assert!(store.find_by_email("alice@example.com").await.unwrap().is_some());
        assert!(matches!(
            store.create(new_account("ALICE@example.com")).await,
            Err(StoreError::DuplicateEmail)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_leaves_one_account() {
        let store = MemoryCredentialStore::new();
        store.create(new_account("bob@example.com")).await.unwrap();

        let second = store.create(new_account("bob@example.com")).await;
        assert!(matches!(second, Err(StoreError::DuplicateEmail)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_only_one_wins() {
        let store = Arc::new(MemoryCredentialStore::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_account("race@example.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_lookups_are_none() {
        let store = MemoryCredentialStore::new();
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
