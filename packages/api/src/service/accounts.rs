//! # Member accounts and sign-in
//!
//! Login, refresh, registration and password changes for members, plus the
//! administrator login. Failures during login never say which part was wrong:
//! an unknown username, a soft-deleted account and a wrong password all answer
//! `INVALID_CREDENTIALS`. `ACCOUNT_INACTIVE` is only revealed once the
//! password has been verified.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validate;
use crate::auth::{hash_password_async, verify_password_async, AdminToken, Role, TokenPair};
use crate::db::StoreError;
use crate::error::ApiError;
use crate::models::{Member, MemberChanges, MemberInfo, MemberStatus, MemberSummary, NewMember};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Login, refresh and register response: the member plus a fresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub member: MemberSummary,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Passwords are taken verbatim; only blank detection trims.
fn secret(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn session(state: &AppState, member: &Member) -> Result<AuthSession, ApiError> {
    Ok(AuthSession {
        member: member.to_summary(),
        tokens: state.jwt.issue_pair(member.id, &member.username)?,
    })
}

/// Load the member behind a token, requiring it to exist, not be deleted and
/// be active.
pub async fn require_live_member(state: &AppState, id: Uuid) -> Result<Member, ApiError> {
    let member = state
        .store
        .member_by_id(id)
        .await?
        .filter(|m| !m.is_deleted())
        .ok_or(ApiError::UnknownMember)?;
    if !member.is_active() {
        return Err(ApiError::AccountInactive);
    }
    Ok(member)
}

pub async fn login(state: &AppState, request: LoginRequest) -> Result<AuthSession, ApiError> {
    let (Some(username), Some(password)) = (
        validate::present(request.username),
        secret(request.password),
    ) else {
        return Err(ApiError::MissingCredentials);
    };

    let Some(member) = state
        .store
        .member_by_username(&username)
        .await?
        .filter(|m| !m.is_deleted())
    else {
        tracing::warn!(%username, "login rejected: unknown member");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password_async(password, member.password_hash.clone()).await? {
        tracing::warn!(%username, "login rejected: wrong password");
        return Err(ApiError::InvalidCredentials);
    }
    if !member.is_active() {
        return Err(ApiError::AccountInactive);
    }

    tracing::info!(member_id = %member.id, %username, "member logged in");
    session(state, &member)
}

pub async fn refresh(state: &AppState, request: RefreshRequest) -> Result<AuthSession, ApiError> {
    let token = secret(request.refresh_token).ok_or(ApiError::MissingRefreshToken)?;

    let claims = state.jwt.verify_refresh(token.trim()).map_err(|e| {
        tracing::debug!(error = %e, "rejected refresh token");
        ApiError::InvalidRefreshToken
    })?;
    if claims.role != Role::Member {
        return Err(ApiError::InvalidRefreshToken);
    }
    let member_id =
        Uuid::parse_str(&claims.member_id).map_err(|_| ApiError::InvalidRefreshToken)?;

    let member = require_live_member(state, member_id).await?;
    session(state, &member)
}

pub async fn register(state: &AppState, request: RegisterRequest) -> Result<AuthSession, ApiError> {
    let (Some(username), Some(password)) = (
        validate::present(request.username),
        secret(request.password),
    ) else {
        return Err(ApiError::MissingCredentials);
    };
    let username = validate::username(&username)?;
    validate::new_password(&password)?;
    let full_name = validate::full_name(request.full_name)?;

    if state.store.member_by_username(&username).await?.is_some() {
        return Err(ApiError::UsernameExists);
    }

    let member = state
        .store
        .insert_member(NewMember {
            username,
            password_hash: hash_password_async(password).await?,
            full_name,
            status: MemberStatus::Active,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::UsernameExists,
            other => other.into(),
        })?;

    tracing::info!(member_id = %member.id, username = %member.username, "member registered");
    session(state, &member)
}

pub async fn change_password(
    state: &AppState,
    member_id: Uuid,
    request: ChangePasswordRequest,
) -> Result<(), ApiError> {
    let (Some(current), Some(new)) = (
        secret(request.current_password),
        secret(request.new_password),
    ) else {
        return Err(ApiError::MissingPasswords);
    };
    validate::new_password(&new)?;

    let member = state
        .store
        .member_by_id(member_id)
        .await?
        .filter(|m| !m.is_deleted())
        .ok_or(ApiError::MemberNotFound)?;
    if !member.is_active() {
        return Err(ApiError::AccountInactive);
    }
    if !verify_password_async(current, member.password_hash.clone()).await? {
        return Err(ApiError::InvalidCurrentPassword);
    }

    let changes = MemberChanges {
        password_hash: Some(hash_password_async(new).await?),
        ..Default::default()
    };
    state
        .store
        .update_member(member.id, changes)
        .await?
        .ok_or(ApiError::MemberNotFound)?;

    tracing::info!(%member_id, "member changed password");
    Ok(())
}

pub async fn me(state: &AppState, member_id: Uuid) -> Result<MemberInfo, ApiError> {
    Ok(require_live_member(state, member_id).await?.to_info())
}

/// Sign in the configured administrator.
pub async fn admin_login(state: &AppState, request: LoginRequest) -> Result<AdminToken, ApiError> {
    let (Some(username), Some(password)) = (
        validate::present(request.username),
        secret(request.password),
    ) else {
        return Err(ApiError::MissingCredentials);
    };

    let Some(hash) = state.admin.password_hash.clone() else {
        tracing::warn!(%username, "admin login rejected: no admin password configured");
        return Err(ApiError::InvalidCredentials);
    };
    let password_ok = verify_password_async(password, hash).await?;
    if username != state.admin.username || !password_ok {
        tracing::warn!(%username, "admin login rejected");
        return Err(ApiError::InvalidCredentials);
    }

    tracing::info!(%username, "admin logged in");
    Ok(state.jwt.issue_admin(&username)?)
}
