//! `/api/members`: self-service registration and account endpoints.

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;

use super::{ApiResult, JsonBody};
use crate::auth::AuthMember;
use crate::i18n::{Locale, Notice};
use crate::models::MemberInfo;
use crate::response::{ApiResponse, MessageData};
use crate::service::accounts::{self, AuthSession, ChangePasswordRequest, RegisterRequest};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/change-password", post(change_password))
        .route("/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<AuthSession> {
    Ok(ApiResponse::ok(accounts::register(&state, request).await?))
}

async fn change_password(
    State(state): State<AppState>,
    member: AuthMember,
    locale: Locale,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> ApiResult<MessageData> {
    accounts::change_password(&state, member.member_id, request).await?;
    Ok(ApiResponse::ok(MessageData::new(
        Notice::PasswordChanged.text(locale),
    )))
}

async fn me(State(state): State<AppState>, member: AuthMember) -> ApiResult<MemberInfo> {
    Ok(ApiResponse::ok(accounts::me(&state, member.member_id).await?))
}
