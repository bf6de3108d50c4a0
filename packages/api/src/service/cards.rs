//! # Cards
//!
//! The same operations back the member API and the admin API. [`Actor`]
//! decides the scope: a member only ever sees and changes their own live
//! cards (another member's card answers `CARD_NOT_FOUND`), the administrator
//! sees every live card.
//!
//! Member operations first check that the member behind the token is still
//! live, so a deleted or deactivated member's unexpired token stops working.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{accounts, validate};
use crate::error::ApiError;
use crate::models::{CardChanges, CardInfo, CardQuery, NewCard, Pagination};
use crate::state::AppState;

/// Who is acting on cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Member(Uuid),
    /// The administrator, identified as `admin:<username>`.
    Admin(String),
}

impl Actor {
    fn owner(&self) -> Option<Uuid> {
        match self {
            Actor::Member(id) => Some(*id),
            Actor::Admin(_) => None,
        }
    }

    /// Value recorded in `deleted_by`.
    fn label(&self) -> String {
        match self {
            Actor::Member(id) => id.to_string(),
            Actor::Admin(label) => label.clone(),
        }
    }

    async fn authorize(&self, state: &AppState) -> Result<(), ApiError> {
        if let Actor::Member(id) = self {
            accounts::require_live_member(state, *id).await?;
        }
        Ok(())
    }
}

/// `GET /api/cards` and `GET /api/admin/cards` query string. Numbers are taken
/// as text so bad values map to `INVALID_PAGE` / `INVALID_LIMIT`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    /// Admin only: restrict to one member's cards.
    pub member_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardPayload {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminCardPayload {
    pub member_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPage {
    pub cards: Vec<CardInfo>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardData {
    pub card: CardInfo,
}

/// Both fields present and non-blank, trimmed and length-checked.
fn full_payload(
    title: Option<String>,
    content: Option<String>,
) -> Result<(String, String), ApiError> {
    let (Some(title), Some(content)) = (validate::present(title), validate::present(content))
    else {
        return Err(ApiError::MissingFields);
    };
    Ok((validate::title(title)?, validate::content(content)?))
}

pub async fn list(
    state: &AppState,
    actor: &Actor,
    params: CardListParams,
) -> Result<CardPage, ApiError> {
    actor.authorize(state).await?;

    let page = validate::page(params.page.as_deref(), params.limit.as_deref())?;
    let sort = validate::sort(params.sort.as_deref())?;
    let member_id = match actor {
        Actor::Member(id) => Some(*id),
        Actor::Admin(_) => validate::present(params.member_id)
            .map(|raw| validate::member_id(&raw))
            .transpose()?,
    };

    let query = CardQuery {
        member_id,
        search: validate::present(params.search),
        sort,
        offset: page.offset(),
        limit: page.limit,
    };
    let (cards, total) = state.store.list_cards(&query).await?;

    Ok(CardPage {
        cards: cards.iter().map(|c| c.to_info()).collect(),
        pagination: Pagination::new(page, total),
    })
}

pub async fn get(state: &AppState, actor: &Actor, id: &str) -> Result<CardData, ApiError> {
    actor.authorize(state).await?;
    let id = validate::card_id(id)?;

    let card = state
        .store
        .card_by_id(id, actor.owner())
        .await?
        .ok_or(ApiError::CardNotFound)?;
    Ok(CardData {
        card: card.to_info(),
    })
}

pub async fn create_own(
    state: &AppState,
    member_id: Uuid,
    payload: CardPayload,
) -> Result<CardData, ApiError> {
    Actor::Member(member_id).authorize(state).await?;
    let (title, content) = full_payload(payload.title, payload.content)?;

    let card = state
        .store
        .insert_card(NewCard {
            member_id,
            title,
            content,
        })
        .await?;
    tracing::info!(card_id = %card.id, %member_id, "card created");
    Ok(CardData {
        card: card.to_info(),
    })
}

/// Admin create on behalf of a live (not deleted) member.
pub async fn create_for(state: &AppState, payload: AdminCardPayload) -> Result<CardData, ApiError> {
    let member_id = validate::present(payload.member_id).ok_or(ApiError::MissingFields)?;
    let member_id = validate::member_id(&member_id)?;
    let (title, content) = full_payload(payload.title, payload.content)?;

    state
        .store
        .member_by_id(member_id)
        .await?
        .filter(|m| !m.is_deleted())
        .ok_or(ApiError::MemberNotFound)?;

    let card = state
        .store
        .insert_card(NewCard {
            member_id,
            title,
            content,
        })
        .await?;
    tracing::info!(card_id = %card.id, %member_id, "card created by admin");
    Ok(CardData {
        card: card.to_info(),
    })
}

/// Members replace both fields; the administrator may send either.
pub async fn update(
    state: &AppState,
    actor: &Actor,
    id: &str,
    payload: CardPayload,
) -> Result<CardData, ApiError> {
    actor.authorize(state).await?;
    let id = validate::card_id(id)?;

    let changes = match actor {
        Actor::Member(_) => {
            let (title, content) = full_payload(payload.title, payload.content)?;
            CardChanges {
                title: Some(title),
                content: Some(content),
            }
        }
        Actor::Admin(_) => {
            let title = validate::present(payload.title);
            let content = validate::present(payload.content);
            if title.is_none() && content.is_none() {
                return Err(ApiError::MissingFields);
            }
            CardChanges {
                title: title.map(validate::title).transpose()?,
                content: content.map(validate::content).transpose()?,
            }
        }
    };

    let card = state
        .store
        .update_card(id, actor.owner(), changes)
        .await?
        .ok_or(ApiError::CardNotFound)?;
    Ok(CardData {
        card: card.to_info(),
    })
}

pub async fn delete(state: &AppState, actor: &Actor, id: &str) -> Result<(), ApiError> {
    actor.authorize(state).await?;
    let id = validate::card_id(id)?;

    if !state
        .store
        .soft_delete_card(id, actor.owner(), &actor.label())
        .await?
    {
        return Err(ApiError::CardNotFound);
    }
    tracing::info!(card_id = %id, actor = %actor.label(), "card deleted");
    Ok(())
}
