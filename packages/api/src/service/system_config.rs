//! # System settings
//!
//! Key-value rows in `system_config`. The admin settings endpoint upserts
//! any number of keys at once: each key is looked up, inserted when missing and
//! updated otherwise. An insert that loses a race against a concurrent insert
//! of the same key falls back to an update.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::validate;
use crate::db::StoreError;
use crate::error::ApiError;
use crate::models::ConfigEntry;
use crate::state::AppState;

pub const APP_NAME_KEY: &str = "app_name";

/// `PUT /api/admin/settings` body: `{ "settings": { "app_name": "..." } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsData {
    pub settings: Vec<ConfigEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppName {
    pub app_name: String,
}

pub async fn list(state: &AppState) -> Result<SettingsData, ApiError> {
    Ok(SettingsData {
        settings: state.store.config_list().await?,
    })
}

pub async fn get(state: &AppState, key: &str) -> Result<ConfigEntry, ApiError> {
    let key = validate::config_key(key)?;
    state
        .store
        .config_get(&key)
        .await?
        .ok_or(ApiError::ConfigNotFound)
}

/// Insert or update a single key.
pub async fn upsert(state: &AppState, key: &str, value: &str) -> Result<ConfigEntry, ApiError> {
    let key = validate::config_key(key)?;

    if state.store.config_get(&key).await?.is_none() {
        match state.store.config_insert(&key, value).await {
            Ok(entry) => return Ok(entry),
            Err(StoreError::Conflict(_)) => {
                tracing::debug!(%key, "config key inserted concurrently, updating");
            }
            Err(err) => return Err(err.into()),
        }
    }

    state
        .store
        .config_update(&key, value)
        .await?
        .ok_or(ApiError::ConfigNotFound)
}

/// Validate every key first so a bad key leaves nothing half-written.
pub async fn upsert_many(
    state: &AppState,
    update: SettingsUpdate,
) -> Result<SettingsData, ApiError> {
    if update.settings.is_empty() {
        return Err(ApiError::MissingFields);
    }
    for key in update.settings.keys() {
        validate::config_key(key)?;
    }

    for (key, value) in &update.settings {
        upsert(state, key, value.trim()).await?;
    }
    tracing::info!(keys = ?update.settings.keys().collect::<Vec<_>>(), "settings updated");

    list(state).await
}

/// The configured application name, falling back to `app.name`.
pub async fn app_name(state: &AppState) -> Result<AppName, ApiError> {
    let app_name = state
        .store
        .config_get(APP_NAME_KEY)
        .await?
        .map(|entry| entry.config_value)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| state.settings.app.name.clone());
    Ok(AppName { app_name })
}
