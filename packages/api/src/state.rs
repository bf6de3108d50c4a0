//! Shared handler state.

use std::sync::Arc;

use crate::auth::{hash_password, JwtKeys, PasswordError};
use crate::db::Store;
use crate::i18n::Locale;
use crate::settings::Settings;

/// The configured back-office administrator. `password_hash` is `None` when
/// no admin password is configured, which disables admin login.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password_hash: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt: Arc<JwtKeys>,
    pub admin: Arc<AdminCredentials>,
    pub settings: Arc<Settings>,
    pub default_locale: Locale,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, settings: Settings) -> Result<Self, PasswordError> {
        let password_hash = if settings.admin.password.is_empty() {
            None
        } else {
            Some(hash_password(&settings.admin.password)?)
        };

        let default_locale = settings.app.locale.parse().unwrap_or_else(|_| {
            tracing::warn!(locale = %settings.app.locale, "unknown app.locale, using vi");
            Locale::default()
        });

        Ok(Self {
            store,
            jwt: Arc::new(JwtKeys::from_settings(&settings.jwt)),
            admin: Arc::new(AdminCredentials {
                username: settings.admin.username.clone(),
                password_hash,
            }),
            settings: Arc::new(settings),
            default_locale,
        })
    }
}
