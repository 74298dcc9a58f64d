//! Access and refresh token issuing and verification
//!
//! Both token kinds share one HS256 format and differ only in their
//! `scope` claim. Verification is stateless: a token is accepted when its
//! signature checks out, it has not expired and its scope is the one the
//! caller asked for.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed or its signature does not verify")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token scope does not match")]
    ScopeMismatch,
    #[error("token has no subject")]
    MissingSubject,
}

/// Which use a token was minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    Access,
    Refresh,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Access => "access",
            TokenScope::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified claim set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub scope: TokenScope,
    pub jti: Uuid,
}

/// Claim set as it appears on the wire, before any checks
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    iat: Option<i64>,
    exp: i64,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    jti: Option<Uuid>,
}

/// Pre-computed signing keys, shared by every clone of [`TokenService`]
#[derive(Clone)]
struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl TokenKeys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }
}

/// Token issuer and verifier
///
/// Build once at startup and store in `AppState`; clones share the keys.
#[derive(Clone)]
pub struct TokenService {
    keys: TokenKeys,
    validation: Arc<Validation>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys: TokenKeys::new(secret.as_bytes()),
            validation: Arc::new(validation),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Mint an access token for an account
    pub fn issue_access_token(&self, account_id: Uuid) -> anyhow::Result<String> {
        self.issue(account_id, TokenScope::Access, self.access_ttl_secs)
    }

    /// Mint a refresh token for an account
    pub fn issue_refresh_token(&self, account_id: Uuid) -> anyhow::Result<String> {
        self.issue(account_id, TokenScope::Refresh, self.refresh_ttl_secs)
    }

    fn issue(&self, account_id: Uuid, scope: TokenScope, ttl_secs: i64) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            scope,
            jti: Uuid::new_v4(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign {} token: {}", scope, e))
    }

    /// Verify a token and require the given scope
    ///
    /// Checks run in order: signature and header, expiry, scope, subject.
    pub fn verify(&self, token: &str, expected: TokenScope) -> Result<Claims, TokenError> {
        let data = decode::<RawClaims>(token, &self.keys.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;
        let raw = data.claims;

        let scope = match raw.scope.as_deref() {
            Some("access") => TokenScope::Access,
            Some("refresh") => TokenScope::Refresh,
            _ => return Err(TokenError::ScopeMismatch),
        };
        if scope != expected {
            return Err(TokenError::ScopeMismatch);
        }

        let sub = raw
            .sub
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or(TokenError::MissingSubject)?;

        Ok(Claims {
            sub,
            iat: raw.iat.unwrap_or_default(),
            exp: raw.exp,
            scope,
            jti: raw.jti.unwrap_or_else(Uuid::nil),
        })
    }

    /// Access token lifetime in seconds
    #[inline]
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    #[inline]
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    fn service() -> TokenService {
        TokenService::new(SECRET, 1800, 604800)
    }

    fn sign_raw(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> i64 {
        Utc::now().timestamp() + 600
    }

    #[test]
    fn test_access_token_round_trip() {
        let tokens = service();
        let id = Uuid::new_v4();

        let token = tokens.issue_access_token(id).unwrap();
        let claims = tokens.verify(&token, TokenScope::Access).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.scope, TokenScope::Access);
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let tokens = service();
        let id = Uuid::new_v4();

        let token = tokens.issue_refresh_token(id).unwrap();
        let claims = tokens.verify(&token, TokenScope::Refresh).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.exp - claims.iat, 604800);
    }

    #[test]
    fn test_scopes_are_not_interchangeable() {
        let tokens = service();
        let id = Uuid::new_v4();

        let access = tokens.issue_access_token(id).unwrap();
        let refresh = tokens.issue_refresh_token(id).unwrap();

        assert_eq!(
            tokens.verify(&access, TokenScope::Refresh),
            Err(TokenError::ScopeMismatch)
        );
        assert_eq!(
            tokens.verify(&refresh, TokenScope::Access),
            Err(TokenError::ScopeMismatch)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        let token = tokens
            .issue(Uuid::new_v4(), TokenScope::Access, -10)
            .unwrap();

        assert_eq!(
            tokens.verify(&token, TokenScope::Access),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let other = TokenService::new("a-completely-different-signing-secret", 1800, 604800);
        let token = other.issue_access_token(Uuid::new_v4()).unwrap();

        assert_eq!(
            service().verify(&token, TokenScope::Access),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tokens = service();
        assert_eq!(
            tokens.verify("invalid.token.here", TokenScope::Access),
            Err(TokenError::Malformed)
        );
        assert_eq!(tokens.verify("", TokenScope::Access), Err(TokenError::Malformed));
    }

    #[test]
    fn test_alg_none_rejected() {
        let header = base64_url_segment(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = base64_url_segment(&format!(
            r#"{{"sub":"{}","exp":{},"scope":"access"}}"#,
            Uuid::new_v4(),
            future_exp()
        ));
        let token = format!("{}.{}.", header, payload);

        assert_eq!(
            service().verify(&token, TokenScope::Access),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = serde_json::json!({
            "sub": Uuid::new_v4().to_string(),
            "exp": future_exp(),
            "scope": "access",
        });
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            service().verify(&token, TokenScope::Access),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_missing_subject() {
        let tokens = service();

        let no_sub = sign_raw(
            serde_json::json!({"exp": future_exp(), "scope": "access"}),
            SECRET,
        );
        assert_eq!(
            tokens.verify(&no_sub, TokenScope::Access),
            Err(TokenError::MissingSubject)
        );

        let empty_sub = sign_raw(
            serde_json::json!({"sub": "", "exp": future_exp(), "scope": "access"}),
            SECRET,
        );
        assert_eq!(
            tokens.verify(&empty_sub, TokenScope::Access),
            Err(TokenError::MissingSubject)
        );

        let not_an_id = sign_raw(
            serde_json::json!({"sub": "alice", "exp": future_exp(), "scope": "access"}),
            SECRET,
        );
        assert_eq!(
            tokens.verify(&not_an_id, TokenScope::Access),
            Err(TokenError::MissingSubject)
        );
    }

    #[test]
    fn test_missing_scope_is_mismatch() {
        let token = sign_raw(
            serde_json::json!({"sub": Uuid::new_v4().to_string(), "exp": future_exp()}),
            SECRET,
        );
        assert_eq!(
            service().verify(&token, TokenScope::Access),
            Err(TokenError::ScopeMismatch)
        );
    }

    #[test]
    fn test_expiry_checked_before_scope() {
        let tokens = service();
        let token = tokens
            .issue(Uuid::new_v4(), TokenScope::Refresh, -10)
            .unwrap();

        assert_eq!(
            tokens.verify(&token, TokenScope::Access),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tokens_minted_together_are_distinct() {
        let tokens = service();
        let id = Uuid::new_v4();

        let first = tokens.issue_access_token(id).unwrap();
        let second = tokens.issue_access_token(id).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_clones_share_keys() {
        let tokens = service();
        let cloned = tokens.clone();
        let id = Uuid::new_v4();

        let token = tokens.issue_access_token(id).unwrap();
        assert_eq!(cloned.verify(&token, TokenScope::Access).unwrap().sub, id);
    }

    /// Base64url without padding, enough to hand-build an unsigned token
    fn base64_url_segment(input: &str) -> String {
        const ALPHABET: &[u8; 64] =
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
        let bytes = input.as_bytes();
        let mut out = String::new();
        for chunk in bytes.chunks(3) {
            let b = [
                chunk[0],
                *chunk.get(1).unwrap_or(&0),
                *chunk.get(2).unwrap_or(&0),
            ];
            let n = ((b[0] as u32) << 16) | ((b[1] as u32) << 8) | b[2] as u32;
            let chars = chunk.len() + 1;
            for i in 0..chars {
                out.push(ALPHABET[((n >> (18 - 6 * i)) & 0x3f) as usize] as char);
            }
        }
        out
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_access_verifies_only_as_access(bytes in any::<[u8; 16]>()) {
            let tokens = service();
            let id = Uuid::from_bytes(bytes);

            let token = tokens.issue_access_token(id).unwrap();
            prop_assert_eq!(tokens.verify(&token, TokenScope::Access).unwrap().sub, id);
            prop_assert_eq!(
                tokens.verify(&token, TokenScope::Refresh),
                Err(TokenError::ScopeMismatch)
            );
        }

        #[test]
        fn prop_past_expiry_always_expired(ttl in -100_000i64..-1) {
            let tokens = service();
            let token = tokens.issue(Uuid::new_v4(), TokenScope::Access, ttl).unwrap();
            prop_assert_eq!(tokens.verify(&token, TokenScope::Access), Err(TokenError::Expired));
        }
    }
}
