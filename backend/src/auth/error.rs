use super::jwt::TokenError;
use super::store::StoreError;
use thiserror::Error;
use wellness_tracker_shared::FieldError;

/// Outcome of a failed authentication operation
///
/// Token detail is collapsed here: callers only learn whether the token
/// expired or was otherwise unusable.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("could not validate credentials")]
    Unauthenticated,
    #[error("token has expired")]
    TokenExpired,
    #[error("{0}")]
    Validation(FieldError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Malformed | TokenError::ScopeMismatch | TokenError::MissingSubject => {
                AuthError::Unauthenticated
            }
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            StoreError::Backend(e) => AuthError::Internal(e),
        }
    }
}

impl From<FieldError> for AuthError {
    fn from(err: FieldError) -> Self {
        AuthError::Validation(err)
    }
}

impl AuthError {
    /// Short label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::DuplicateEmail => "duplicate_email",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::TokenExpired => "expired",
            AuthError::Validation(_) => "validation",
            AuthError::Internal(_) => "internal",
        }
    }
}
