//! Request extractor for authenticated routes
//!
//! Handlers that take [`AuthUser`] only run once the bearer token has been
//! verified and its account loaded through the state's `Authenticator`.

use super::error::AuthError;
use crate::error::ApiError;
use crate::state::AppState;
use crate::repositories::user::Account;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use metrics::counter;
use uuid::Uuid;

/// Authenticated account attached to the request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub account: Account,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let Some(token) = bearer_token(&parts.headers) else {
            counter!("auth_guard_rejections_total", "reason" => "missing_token").increment(1);
            return Err(ApiError::unauthenticated());
        };

        match app_state.authenticator().authenticate(token).await {
            Ok(account) => Ok(AuthUser {
                user_id: account.id,
                account,
            }),
            Err(err) => {
                counter!("auth_guard_rejections_total", "reason" => err.reason()).increment(1);
                Err(match err {
                    AuthError::Internal(e) => ApiError::Internal(e),
                    AuthError::TokenExpired => ApiError::TokenExpired,
                    _ => ApiError::unauthenticated(),
                })
            }
        }
    }
}

/// Token from `Authorization: Bearer <token>`; scheme is case-insensitive
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
