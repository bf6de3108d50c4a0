//! Admin member management.

use serde::{Deserialize, Serialize};

use super::validate;
use crate::auth::hash_password_async;
use crate::db::StoreError;
use crate::error::ApiError;
use crate::models::{MemberChanges, MemberInfo, MemberQuery, MemberStatus, NewMember, Pagination};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMember {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub status: Option<i16>,
}

/// Partial update. A blank `full_name` clears it; a `password` resets it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMember {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub status: Option<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPage {
    pub members: Vec<MemberInfo>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberData {
    pub member: MemberInfo,
}

fn username_conflict(err: StoreError) -> ApiError {
    match err {
        StoreError::Conflict(_) => ApiError::UsernameExists,
        other => other.into(),
    }
}

pub async fn list(state: &AppState, params: MemberListParams) -> Result<MemberPage, ApiError> {
    let page = validate::page(params.page.as_deref(), params.limit.as_deref())?;
    let query = MemberQuery {
        search: validate::present(params.search),
        offset: page.offset(),
        limit: page.limit,
    };
    let (members, total) = state.store.list_members(&query).await?;

    Ok(MemberPage {
        members: members.iter().map(|m| m.to_info()).collect(),
        pagination: Pagination::new(page, total),
    })
}

pub async fn get(state: &AppState, id: &str) -> Result<MemberData, ApiError> {
    let id = validate::member_id(id)?;
    let member = state
        .store
        .member_by_id(id)
        .await?
        .filter(|m| !m.is_deleted())
        .ok_or(ApiError::MemberNotFound)?;
    Ok(MemberData {
        member: member.to_info(),
    })
}

pub async fn create(state: &AppState, request: CreateMember) -> Result<MemberData, ApiError> {
    let (Some(username), Some(password)) = (
        validate::present(request.username),
        request.password.filter(|p| !p.trim().is_empty()),
    ) else {
        return Err(ApiError::MissingCredentials);
    };
    let username = validate::username(&username)?;
    validate::new_password(&password)?;
    let full_name = validate::full_name(request.full_name)?;
    let status = validate::status(request.status)?.unwrap_or(MemberStatus::Active);

    if state.store.member_by_username(&username).await?.is_some() {
        return Err(ApiError::UsernameExists);
    }

    let member = state
        .store
        .insert_member(NewMember {
            username,
            password_hash: hash_password_async(password).await?,
            full_name,
            status,
        })
        .await
        .map_err(username_conflict)?;

    tracing::info!(member_id = %member.id, username = %member.username, "member created by admin");
    Ok(MemberData {
        member: member.to_info(),
    })
}

pub async fn update(
    state: &AppState,
    id: &str,
    request: UpdateMember,
) -> Result<MemberData, ApiError> {
    let id = validate::member_id(id)?;

    let username = validate::present(request.username)
        .map(|u| validate::username(&u))
        .transpose()?;
    let password = request.password.filter(|p| !p.trim().is_empty());
    if let Some(password) = &password {
        validate::new_password(password)?;
    }
    let full_name = request
        .full_name
        .map(|name| validate::full_name(Some(name)))
        .transpose()?;
    let status = validate::status(request.status)?;

    if let Some(username) = &username {
        if let Some(existing) = state.store.member_by_username(username).await? {
            if existing.id != id {
                return Err(ApiError::UsernameExists);
            }
        }
    }

    let changes = MemberChanges {
        username,
        password_hash: match password {
            Some(password) => Some(hash_password_async(password).await?),
            None => None,
        },
        full_name,
        status,
    };
    if changes.is_empty() {
        return Err(ApiError::MissingFields);
    }

    let member = state
        .store
        .update_member(id, changes)
        .await
        .map_err(username_conflict)?
        .ok_or(ApiError::MemberNotFound)?;

    tracing::info!(member_id = %member.id, "member updated by admin");
    Ok(MemberData {
        member: member.to_info(),
    })
}

/// Soft-delete a member. Their cards stay in place but are unreachable
/// through the member API because the owner is no longer live.
pub async fn delete(state: &AppState, id: &str, actor: &str) -> Result<(), ApiError> {
    let id = validate::member_id(id)?;
    if !state.store.soft_delete_member(id, actor).await? {
        return Err(ApiError::MemberNotFound);
    }
    tracing::info!(member_id = %id, %actor, "member deleted");
    Ok(())
}
