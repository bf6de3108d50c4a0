//! # `/api/admin`: back-office API
//!
//! Everything except `POST /login` requires an admin token. Member and card
//! deletes record `admin:<username>` as the actor.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Router;

use super::{ApiResult, JsonBody, QueryParams};
use crate::auth::{AdminToken, AuthAdmin};
use crate::i18n::{Locale, Notice};
use crate::models::{ConfigEntry, DashboardStats};
use crate::response::{ApiResponse, MessageData};
use crate::service::accounts::{self, LoginRequest};
use crate::service::cards::{
    self, Actor, AdminCardPayload, CardData, CardListParams, CardPage, CardPayload,
};
use crate::service::dashboard;
use crate::service::members::{
    self, CreateMember, MemberData, MemberListParams, MemberPage, UpdateMember,
};
use crate::service::system_config::{self, SettingsData, SettingsUpdate};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/dashboard", get(stats))
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/{id}",
            get(show_member).put(update_member).delete(delete_member),
        )
        .route("/cards", get(list_cards).post(create_card))
        .route(
            "/cards/{id}",
            get(show_card).put(update_card).delete(delete_card),
        )
        .route("/settings", get(list_settings).put(update_settings))
        .route("/settings/{key}", get(show_setting))
}

fn actor(admin: &AuthAdmin) -> Actor {
    Actor::Admin(admin.actor())
}

async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<AdminToken> {
    Ok(ApiResponse::ok(accounts::admin_login(&state, request).await?))
}

async fn stats(State(state): State<AppState>, _admin: AuthAdmin) -> ApiResult<DashboardStats> {
    Ok(ApiResponse::ok(dashboard::stats(&state).await?))
}

// members

async fn list_members(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    QueryParams(params): QueryParams<MemberListParams>,
) -> ApiResult<MemberPage> {
    Ok(ApiResponse::ok(members::list(&state, params).await?))
}

async fn create_member(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    JsonBody(request): JsonBody<CreateMember>,
) -> ApiResult<MemberData> {
    Ok(ApiResponse::ok(members::create(&state, request).await?))
}

async fn show_member(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<String>,
) -> ApiResult<MemberData> {
    Ok(ApiResponse::ok(members::get(&state, &id).await?))
}

async fn update_member(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateMember>,
) -> ApiResult<MemberData> {
    Ok(ApiResponse::ok(members::update(&state, &id, request).await?))
}

async fn delete_member(
    State(state): State<AppState>,
    admin: AuthAdmin,
    locale: Locale,
    Path(id): Path<String>,
) -> ApiResult<MessageData> {
    members::delete(&state, &id, &admin.actor()).await?;
    Ok(ApiResponse::ok(MessageData::new(
        Notice::MemberDeleted.text(locale),
    )))
}

// cards

async fn list_cards(
    State(state): State<AppState>,
    admin: AuthAdmin,
    QueryParams(params): QueryParams<CardListParams>,
) -> ApiResult<CardPage> {
    Ok(ApiResponse::ok(
        cards::list(&state, &actor(&admin), params).await?,
    ))
}

async fn create_card(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    JsonBody(payload): JsonBody<AdminCardPayload>,
) -> ApiResult<CardData> {
    Ok(ApiResponse::ok(cards::create_for(&state, payload).await?))
}

async fn show_card(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Path(id): Path<String>,
) -> ApiResult<CardData> {
    Ok(ApiResponse::ok(cards::get(&state, &actor(&admin), &id).await?))
}

async fn update_card(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<CardPayload>,
) -> ApiResult<CardData> {
    Ok(ApiResponse::ok(
        cards::update(&state, &actor(&admin), &id, payload).await?,
    ))
}

async fn delete_card(
    State(state): State<AppState>,
    admin: AuthAdmin,
    locale: Locale,
    Path(id): Path<String>,
) -> ApiResult<MessageData> {
    cards::delete(&state, &actor(&admin), &id).await?;
    Ok(ApiResponse::ok(MessageData::new(Notice::CardDeleted.text(locale))))
}

// settings

async fn list_settings(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> ApiResult<SettingsData> {
    Ok(ApiResponse::ok(system_config::list(&state).await?))
}

async fn update_settings(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    JsonBody(update): JsonBody<SettingsUpdate>,
) -> ApiResult<SettingsData> {
    Ok(ApiResponse::ok(system_config::upsert_many(&state, update).await?))
}

async fn show_setting(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(key): Path<String>,
) -> ApiResult<ConfigEntry> {
    Ok(ApiResponse::ok(system_config::get(&state, &key).await?))
}
