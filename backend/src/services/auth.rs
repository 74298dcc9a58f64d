//! Registration, login and token refresh
//!
//! Works only through a [`CredentialStore`], so the whole flow runs the
//! same against PostgreSQL and the in-memory store.

use crate::auth::{AuthError, CredentialStore, NewAccount, PasswordService, TokenScope, TokenService};
use crate::config::AuthConfig;
use crate::repositories::user::Account;
use metrics::counter;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use wellness_tracker_shared::validation::{validate_email, validate_password};
use wellness_tracker_shared::{AuthTokens, FieldError, RegisteredAccount};

const TOKEN_TYPE: &str = "bearer";
const MAX_USERNAME_LENGTH: usize = 100;

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenService,
    min_password_length: usize,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenService, config: &AuthConfig) -> Self {
        Self {
            store,
            tokens,
            min_password_length: config.min_password_length,
        }
    }

    /// Create an account
    pub async fn register(
        &self,
        email: &str,
        password: SecretString,
        username: Option<String>,
    ) -> Result<RegisteredAccount, AuthError> {
        validate_email(email)?;
        validate_password(password.expose_secret(), self.min_password_length)?;
        let username = username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        if username
            .as_ref()
            .is_some_and(|u| u.chars().count() > MAX_USERNAME_LENGTH)
        {
            return Err(FieldError::new("username", "Username too long").into());
        }

        let password_hash = PasswordService::hash_async(password).await?;

        let account = match self
            .store
            .create(NewAccount {
                email: email.to_string(),
                password_hash,
                username,
            })
            .await
        {
            Ok(account) => account,
            Err(e) => {
                let err = AuthError::from(e);
                counter!("auth_register_total", "outcome" => err.reason()).increment(1);
                return Err(err);
            }
        };

        counter!("auth_register_total", "outcome" => "success").increment(1);
        info!(user_id = %account.id, "Account registered");

        Ok(RegisteredAccount {
            id: account.id.to_string(),
            email: account.email,
            username: account.username,
        })
    }

    /// Exchange email and password for a token pair
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: SecretString) -> Result<AuthTokens, AuthError> {
        let result = self.check_credentials(email, password).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.reason(),
        };
        counter!("auth_login_total", "outcome" => outcome).increment(1);

        let account = result?;
        self.issue_pair(account.id)
    }

    async fn check_credentials(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Account, AuthError> {
        let Some(account) = self.store.find_by_email(email).await? else {
            PasswordService::verify_dummy(password).await;
            return Err(AuthError::InvalidCredentials);
        };

        let valid = match PasswordService::verify_async(password, account.password_hash.clone()).await
        {
            Ok(valid) => valid,
            Err(e) => {
                warn!(user_id = %account.id, "Stored password hash unreadable: {}", e);
                false
            }
        };

        if valid {
            Ok(account)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Mint a fresh pair from a refresh token
    ///
    /// Older tokens stay valid until they expire.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let result = self.resolve_refresh(refresh_token).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.reason(),
        };
        counter!("auth_refresh_total", "outcome" => outcome).increment(1);

        let account_id = result?;
        self.issue_pair(account_id)
    }

    async fn resolve_refresh(&self, refresh_token: &str) -> Result<Uuid, AuthError> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenScope::Refresh)
            .map_err(|_| AuthError::Unauthenticated)?;

        self.store
            .find_by_id(claims.sub)
            .await?
            .map(|account| account.id)
            .ok_or(AuthError::Unauthenticated)
    }

    fn issue_pair(&self, account_id: Uuid) -> Result<AuthTokens, AuthError> {
        Ok(AuthTokens {
            access_token: self.tokens.issue_access_token(account_id)?,
            refresh_token: self.tokens.issue_refresh_token(account_id)?,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.tokens.access_ttl_secs(),
        })
    }
}
