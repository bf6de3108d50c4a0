//! # Request authentication
//!
//! [`AuthMember`] and [`AuthAdmin`] are axum extractors. Putting one in a
//! handler's arguments makes the route require a valid bearer token:
//!
//! | Situation | Error code |
//! |-----------|------------|
//! | no `Authorization` header | `MISSING_TOKEN` |
//! | header is not `Bearer <token>` | `INVALID_TOKEN_FORMAT` |
//! | token fails verification, or is a refresh token | `INVALID_TOKEN` |
//! | member token on an admin route | `FORBIDDEN` |
//!
//! The extractors only check the token. Whether the member still exists and
//! is active is decided by the services that load the member.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use super::jwt::{Claims, Role};
use crate::error::ApiError;
use crate::state::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` value.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, ApiError> {
    let header = header.ok_or(ApiError::MissingToken)?;
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::InvalidTokenFormat),
    }
}

fn access_claims(parts: &Parts, state: &AppState) -> Result<Claims, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| ApiError::InvalidTokenFormat))
        .transpose()?;
    let token = extract_bearer(header)?;

    state.jwt.verify_access(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected access token");
        ApiError::InvalidToken
    })
}

/// An authenticated member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMember {
    pub member_id: Uuid,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = access_claims(parts, state)?;
        if claims.role != Role::Member {
            return Err(ApiError::InvalidToken);
        }
        let member_id = Uuid::parse_str(&claims.member_id).map_err(|_| ApiError::InvalidToken)?;

        Ok(Self {
            member_id,
            username: claims.username,
        })
    }
}

/// An authenticated back-office administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthAdmin {
    pub username: String,
}

impl AuthAdmin {
    /// Value written to `deleted_by` for admin-initiated deletes.
    pub fn actor(&self) -> String {
        format!("admin:{}", self.username)
    }
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = access_claims(parts, state)?;
        if claims.role != Role::Admin {
            return Err(ApiError::Forbidden);
        }

        Ok(Self {
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(extract_bearer(None), Err(ApiError::MissingToken)));
    }

    #[test]
    fn test_malformed_headers() {
        for header in ["Token abc", "Bearer", "Bearer ", "bearer abc", "Bearer a b", "abc"] {
            assert!(
                matches!(extract_bearer(Some(header)), Err(ApiError::InvalidTokenFormat)),
                "{header:?} should be rejected"
            );
        }
    }
}
