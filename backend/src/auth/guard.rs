//! Session guard: bearer token to account

use super::error::AuthError;
use super::jwt::{TokenScope, TokenService};
use super::store::CredentialStore;
use crate::repositories::user::Account;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Resolves a bearer token to the account it was issued for
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, bearer: &str) -> Result<Account, AuthError>;
}

pub struct SessionGuard<S: CredentialStore + ?Sized> {
    store: Arc<S>,
    tokens: TokenService,
}

impl<S: CredentialStore + ?Sized> SessionGuard<S> {
    pub fn new(store: Arc<S>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }
}

#[async_trait]
impl<S: CredentialStore + ?Sized> Authenticator for SessionGuard<S> {
    async fn authenticate(&self, bearer: &str) -> Result<Account, AuthError> {
        if bearer.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        let claims = self.tokens.verify(bearer, TokenScope::Access).map_err(|e| {
            debug!(reason = %e, "Bearer token rejected");
            AuthError::from(e)
        })?;

        // Account may have been deleted since the token was issued
        self.store
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::{MemoryCredentialStore, NewAccount};

    fn tokens() -> TokenService {
        TokenService::new("guard-test-secret-long-enough-for-hs256", 1800, 604800)
    }

    async fn setup() -> (Arc<MemoryCredentialStore>, SessionGuard<MemoryCredentialStore>, Account) {
        let store = Arc::new(MemoryCredentialStore::new());
        let account = store
            .create(NewAccount {
                email: "alice@example.com".to_string(),
                password_hash: "$argon2id$placeholder".to_string(),
                username: Some("alice".to_string()),
            })
            .await
            .unwrap();
        let guard = SessionGuard::new(store.clone(), tokens());
        (store, guard, account)
    }

    #[tokio::test]
    async fn test_access_token_resolves_account() {
        let (_, guard, account) = setup().await;
        let token = tokens().issue_access_token(account.id).unwrap();

        let resolved = guard.authenticate(&token).await.unwrap();
        assert_eq!(resolved.id, account.id);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_a_session() {
        let (_, guard, account) = setup().await;
        let token = tokens().issue_refresh_token(account.id).unwrap();

        assert!(matches!(
            guard.authenticate(&token).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_deleted_account_is_unauthenticated() {
        let (store, guard, account) = setup().await;
        let token = tokens().issue_access_token(account.id).unwrap();
        store.remove(account.id).await;

        assert!(matches!(
            guard.authenticate(&token).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_empty_and_garbage_tokens() {
        let (_, guard, _) = setup().await;

        assert!(matches!(guard.authenticate("").await, Err(AuthError::Unauthenticated)));
        assert!(matches!(
            guard.authenticate("not.a.token").await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let (store, _, account) = setup().await;
        let store: Arc<dyn CredentialStore> = store;
        let guard: Arc<dyn Authenticator> = Arc::new(SessionGuard::new(store, tokens()));

        let token = tokens().issue_access_token(account.id).unwrap();
        assert_eq!(guard.authenticate(&token).await.unwrap().email, "alice@example.com");
    }
}
