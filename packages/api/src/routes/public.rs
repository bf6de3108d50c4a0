//! Unauthenticated endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::ApiResult;
use crate::response::ApiResponse;
use crate::service::system_config::{self, AppName};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/app-name", get(app_name))
        .route("/health", get(health))
}

async fn app_name(State(state): State<AppState>) -> ApiResult<AppName> {
    Ok(ApiResponse::ok(system_config::app_name(&state).await?))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
