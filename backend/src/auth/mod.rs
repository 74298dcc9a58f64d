//! Authentication module
//!
//! HS256 access/refresh tokens, Argon2id password hashing, the credential
//! store contract and the session guard that ties them together.

mod error;
mod guard;
mod jwt;
mod middleware;
mod password;
mod store;

pub use error::AuthError;
pub use guard::{Authenticator, SessionGuard};
pub use jwt::{Claims, TokenError, TokenScope, TokenService};
pub use middleware::{bearer_token, AuthUser};
pub use password::PasswordService;
pub use store::{CredentialStore, MemoryCredentialStore, NewAccount, PgCredentialStore, StoreError};
