//! # HTTP routes
//!
//! | Prefix | Module | Authentication |
//! |--------|--------|----------------|
//! | `/api/auth` | [`auth`] | none, except logout (member) |
//! | `/api/members` | [`members`] | none for register, member otherwise |
//! | `/api/cards` | [`cards`] | member |
//! | `/api/admin` | [`admin`] | admin, except login |
//! | `/api/app-name`, `/health` | [`public`] | none |
//!
//! Handlers are thin: they pull the caller and the payload out of the request
//! and hand them to a [`service`](crate::service) function. Every response is
//! an [`ApiResponse`] envelope; errors pass through the
//! [`localize_errors`] middleware on the way out.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::{middleware, Json, Router};
use serde::de::DeserializeOwned;

use crate::error::{localize_errors, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

mod admin;
mod auth;
mod cards;
mod members;
mod public;

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// `Json<T>` whose rejection is an [`ApiError::MalformedBody`] envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::MalformedBody(rejection.body_text())),
        }
    }
}

/// `Query<T>` whose rejection is an [`ApiError::MalformedQuery`] envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::MalformedQuery(rejection.body_text())),
        }
    }
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// The complete application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(public::routes())
        .nest("/api/auth", auth::routes())
        .nest("/api/members", members::routes())
        .nest("/api/cards", cards::routes())
        .nest("/api/admin", admin::routes())
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(state.clone(), localize_errors))
        .with_state(state)
}
