//! Credentials and tokens: password hashing, JWT issuance/verification and
//! the axum extractors that authenticate requests.

mod extract;
mod jwt;
mod password;

pub use extract::{extract_bearer, AuthAdmin, AuthMember};
pub use jwt::{AdminToken, Claims, JwtKeys, Role, TokenError, TokenKind, TokenPair};
pub use password::{
    hash_password, hash_password_async, verify_password, verify_password_async, PasswordError,
};
