//! # Locales: Vietnamese and English responses
//!
//! Every error and status message the API returns exists in both languages.
//! The language for a request is picked by [`Locale::resolve`]:
//!
//! 1. a `?locale=vi|en` query parameter;
//! 2. the first recognised tag of the `Accept-Language` header;
//! 3. the configured default (`app.locale`, itself defaulting to Vietnamese).
//!
//! [`Locale`] is also an axum extractor so handlers can localise the messages
//! they build themselves ([`Notice`]).

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use axum::extract::{FromRequestParts, Query};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Vi => "vi",
            Locale::En => "en",
        }
    }

    /// Parse a language tag such as `en`, `en-US` or `vi_VN`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "vi" => Some(Locale::Vi),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// First supported language in an `Accept-Language` value. Quality
    /// weights are ignored; browsers already list tags in preference order.
    pub fn from_accept_language(value: &str) -> Option<Self> {
        value
            .split(',')
            .filter_map(|entry| entry.split(';').next())
            .find_map(Locale::from_tag)
    }

    pub fn resolve(uri: &Uri, headers: &HeaderMap, fallback: Locale) -> Self {
        if let Ok(Query(query)) = Query::<LocaleQuery>::try_from_uri(uri) {
            if let Some(locale) = query.locale.as_deref().and_then(Locale::from_tag) {
                return locale;
            }
        }

        headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(Locale::from_accept_language)
            .unwrap_or(fallback)
    }

    /// Pick between the Vietnamese and English rendering of a message.
    pub fn pick(self, vi: &'static str, en: &'static str) -> &'static str {
        match self {
            Locale::Vi => vi,
            Locale::En => en,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_tag(s).ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct LocaleQuery {
    locale: Option<String>,
}

impl FromRequestParts<AppState> for Locale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Locale::resolve(&parts.uri, &parts.headers, state.default_locale))
    }
}

/// Success messages returned in `{ "message": ... }` payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LoggedOut,
    PasswordChanged,
    CardDeleted,
    MemberDeleted,
}

impl Notice {
    pub fn text(self, locale: Locale) -> &'static str {
        match self {
            Notice::LoggedOut => locale.pick("Đăng xuất thành công", "Logged out successfully"),
            Notice::PasswordChanged => locale.pick(
                "Mật khẩu đã được thay đổi thành công",
                "Password changed successfully",
            ),
            Notice::CardDeleted => {
                locale.pick("Card đã được xóa thành công", "Card deleted successfully")
            }
            Notice::MemberDeleted => locale.pick(
                "Thành viên đã được xóa thành công",
                "Member deleted successfully",
            ),
        }
    }
}
