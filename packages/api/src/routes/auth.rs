//! `/api/auth`: member login, token refresh and logout.

use axum::extract::State;
use axum::routing::post;
use axum::Router;

use super::{ApiResult, JsonBody};
use crate::auth::AuthMember;
use crate::i18n::{Locale, Notice};
use crate::response::{ApiResponse, MessageData};
use crate::service::accounts::{self, AuthSession, LoginRequest, RefreshRequest};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<AuthSession> {
    Ok(ApiResponse::ok(accounts::login(&state, request).await?))
}

async fn refresh(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshRequest>,
) -> ApiResult<AuthSession> {
    Ok(ApiResponse::ok(accounts::refresh(&state, request).await?))
}

/// Tokens are stateless; logging out only confirms the token was valid.
async fn logout(member: AuthMember, locale: Locale) -> ApiResult<MessageData> {
    tracing::info!(member_id = %member.member_id, "member logged out");
    Ok(ApiResponse::ok(MessageData::new(Notice::LoggedOut.text(locale))))
}
