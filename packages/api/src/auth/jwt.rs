//! # JSON Web Tokens: HS256 access and refresh tokens
//!
//! Members get a pair of bearer tokens on login, refresh and registration:
//!
//! | Token | Default lifetime | `type` claim |
//! |-------|------------------|--------------|
//! | access | 1 hour (`jwt.access`) | `"access"` |
//! | refresh | 30 days (`jwt.refresh`) | `"refresh"` |
//!
//! Both carry the member id and username. Verification fails closed: a bad
//! signature, a malformed token, an expired `exp` (no leeway) or the wrong
//! `type` all yield a [`TokenError`]. Administrators receive an access token
//! with `role = "admin"` and a `member_id` of `admin:<username>`, which never
//! parses as a member UUID.
//!
//! Tokens are stateless. Logout is the client discarding them; nothing is
//! revoked server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub member_id: String,
    pub username: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default)]
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// What login, refresh and register hand back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminToken {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is malformed or its signature does not match")]
    Invalid,
    #[error("expected a {expected:?} token")]
    WrongKind { expected: TokenKind },
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Signing material plus token lifetimes.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &[u8], access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }

    pub fn from_settings(jwt: &settings::Jwt) -> Self {
        Self::new(jwt.secret.as_bytes(), jwt.access, jwt.refresh)
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    fn sign(
        &self,
        member_id: String,
        username: &str,
        kind: TokenKind,
        role: Role,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            member_id,
            username: username.to_string(),
            kind,
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Issue an access + refresh token pair for a member.
    pub fn issue_pair(&self, member_id: Uuid, username: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign(
                member_id.to_string(),
                username,
                TokenKind::Access,
                Role::Member,
            )?,
            refresh_token: self.sign(
                member_id.to_string(),
                username,
                TokenKind::Refresh,
                Role::Member,
            )?,
            expires_in: self.access_ttl_secs(),
            token_type: "Bearer".to_string(),
        })
    }

    /// Issue an admin access token. Admin sessions have no refresh token.
    pub fn issue_admin(&self, username: &str) -> Result<AdminToken, TokenError> {
        Ok(AdminToken {
            access_token: self.sign(
                format!("admin:{username}"),
                username,
                TokenKind::Access,
                Role::Admin,
            )?,
            expires_in: self.access_ttl_secs(),
            token_type: "Bearer".to_string(),
        })
    }

    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?
            .claims;

        if claims.kind != expected {
            return Err(TokenError::WrongKind { expected });
        }
        Ok(claims)
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn keys() -> JwtKeys {
        JwtKeys::new(SECRET, 3600, 30 * 24 * 3600)
    }

    #[test]
    fn test_issue_and_verify_pair() {
        let keys = keys();
        let id = Uuid::new_v4();
        let pair = keys.issue_pair(id, "lan").unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 3600);

        let access = keys.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.member_id, id.to_string());
        assert_eq!(access.username, "lan");
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(access.role, Role::Member);

        let refresh = keys.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let keys = keys();
        let pair = keys.issue_pair(Uuid::new_v4(), "lan").unwrap();
        assert!(matches!(
            keys.verify_access(&pair.refresh_token),
            Err(TokenError::WrongKind { expected: TokenKind::Access })
        ));
        assert!(matches!(
            keys.verify_refresh(&pair.access_token),
            Err(TokenError::WrongKind { expected: TokenKind::Refresh })
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = JwtKeys::new(SECRET, -60, -60);
        let pair = keys.issue_pair(Uuid::new_v4(), "lan").unwrap();
        assert!(matches!(
            keys.verify_access(&pair.access_token),
            Err(TokenError::Expired)
        ));
        assert!(matches!(
            keys.verify_refresh(&pair.refresh_token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let other = JwtKeys::new(b"another-secret-another-secret-00", 3600, 3600);
        let pair = other.issue_pair(Uuid::new_v4(), "lan").unwrap();
        assert!(matches!(
            keys().verify_access(&pair.access_token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            keys().verify_access("not.a.token"),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(keys().verify_access(""), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_admin_token() {
        let keys = keys();
        let token = keys.issue_admin("root").unwrap();
        let claims = keys.verify_access(&token.access_token).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.member_id, "admin:root");
        assert!(Uuid::parse_str(&claims.member_id).is_err());
    }
}
