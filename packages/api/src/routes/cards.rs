//! `/api/cards`: a member's own cards.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;

use super::{ApiResult, JsonBody, QueryParams};
use crate::auth::AuthMember;
use crate::i18n::{Locale, Notice};
use crate::response::{ApiResponse, MessageData};
use crate::service::cards::{self, Actor, CardData, CardListParams, CardPage, CardPayload};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
}

async fn list(
    State(state): State<AppState>,
    member: AuthMember,
    QueryParams(params): QueryParams<CardListParams>,
) -> ApiResult<CardPage> {
    let actor = Actor::Member(member.member_id);
    Ok(ApiResponse::ok(cards::list(&state, &actor, params).await?))
}

async fn create(
    State(state): State<AppState>,
    member: AuthMember,
    JsonBody(payload): JsonBody<CardPayload>,
) -> ApiResult<CardData> {
    Ok(ApiResponse::ok(
        cards::create_own(&state, member.member_id, payload).await?,
    ))
}

async fn show(
    State(state): State<AppState>,
    member: AuthMember,
    Path(id): Path<String>,
) -> ApiResult<CardData> {
    let actor = Actor::Member(member.member_id);
    Ok(ApiResponse::ok(cards::get(&state, &actor, &id).await?))
}

async fn update(
    State(state): State<AppState>,
    member: AuthMember,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<CardPayload>,
) -> ApiResult<CardData> {
    let actor = Actor::Member(member.member_id);
    Ok(ApiResponse::ok(
        cards::update(&state, &actor, &id, payload).await?,
    ))
}

async fn destroy(
    State(state): State<AppState>,
    member: AuthMember,
    locale: Locale,
    Path(id): Path<String>,
) -> ApiResult<MessageData> {
    let actor = Actor::Member(member.member_id);
    cards::delete(&state, &actor, &id).await?;
    Ok(ApiResponse::ok(MessageData::new(Notice::CardDeleted.text(locale))))
}
