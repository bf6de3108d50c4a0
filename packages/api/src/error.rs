//! # API errors
//!
//! [`ApiError`] carries one variant per error code the API can return. Each
//! variant knows its HTTP status, its wire code and its message in both
//! locales. Converting an error into a response renders it in Vietnamese and
//! tags the response with an [`ErrorTag`]; the [`localize_errors`] middleware
//! re-renders tagged responses in the locale the caller asked for.
//!
//! Storage, hashing and signing failures are logged at `error` level and
//! reach the client only as `DATABASE_ERROR` / `INTERNAL_ERROR`.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::auth::{PasswordError, TokenError};
use crate::db::StoreError;
use crate::i18n::Locale;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("access token is required")]
    MissingToken,
    #[error("refresh token is required")]
    MissingRefreshToken,
    #[error("authorization header is not `Bearer <token>`")]
    InvalidTokenFormat,
    #[error("access token is invalid or expired")]
    InvalidToken,
    #[error("refresh token is invalid or expired")]
    InvalidRefreshToken,
    #[error("admin privileges required")]
    Forbidden,
    #[error("username and password are required")]
    MissingCredentials,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account is inactive")]
    AccountInactive,
    /// The member behind a token no longer exists or was deleted.
    #[error("member behind the token no longer exists")]
    UnknownMember,
    #[error("member not found")]
    MemberNotFound,
    #[error("username already exists")]
    UsernameExists,
    #[error("password is too short")]
    WeakPassword,
    #[error("current and new password are required")]
    MissingPasswords,
    #[error("current password is wrong")]
    InvalidCurrentPassword,
    #[error("username must be 3 to 50 characters")]
    InvalidUsername,
    #[error("full name is too long")]
    FullNameTooLong,
    #[error("status must be 0 or 1")]
    InvalidStatus,
    #[error("title and content are required")]
    MissingFields,
    #[error("title is too long")]
    TitleTooLong,
    #[error("content is too long")]
    ContentTooLong,
    #[error("page must be a positive integer")]
    InvalidPage,
    #[error("limit must be a positive integer")]
    InvalidLimit,
    #[error("sort must be `<field>.<asc|desc>`")]
    InvalidSort,
    #[error("card id is not a valid UUID")]
    InvalidCardId,
    #[error("member id is not a valid UUID")]
    InvalidMemberId,
    #[error("card not found")]
    CardNotFound,
    #[error("config key is invalid")]
    InvalidConfigKey,
    #[error("config key not found")]
    ConfigNotFound,
    #[error("no such route")]
    RouteNotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("malformed query string: {0}")]
    MalformedQuery(String),
    #[error(transparent)]
    Database(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingToken | ApiError::MissingRefreshToken => "MISSING_TOKEN",
            ApiError::InvalidTokenFormat => "INVALID_TOKEN_FORMAT",
            ApiError::InvalidToken | ApiError::InvalidRefreshToken => "INVALID_TOKEN",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::MissingCredentials => "MISSING_CREDENTIALS",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::AccountInactive => "ACCOUNT_INACTIVE",
            ApiError::UnknownMember | ApiError::MemberNotFound => "MEMBER_NOT_FOUND",
            ApiError::UsernameExists => "USERNAME_EXISTS",
            ApiError::WeakPassword => "WEAK_PASSWORD",
            ApiError::MissingPasswords => "MISSING_PASSWORDS",
            ApiError::InvalidCurrentPassword => "INVALID_CURRENT_PASSWORD",
            ApiError::InvalidUsername => "INVALID_USERNAME",
            ApiError::FullNameTooLong => "FULL_NAME_TOO_LONG",
            ApiError::InvalidStatus => "INVALID_STATUS",
            ApiError::MissingFields => "MISSING_FIELDS",
            ApiError::TitleTooLong => "TITLE_TOO_LONG",
            ApiError::ContentTooLong => "CONTENT_TOO_LONG",
            ApiError::InvalidPage => "INVALID_PAGE",
            ApiError::InvalidLimit => "INVALID_LIMIT",
            ApiError::InvalidSort => "INVALID_SORT",
            ApiError::InvalidCardId => "INVALID_CARD_ID",
            ApiError::InvalidMemberId => "INVALID_MEMBER_ID",
            ApiError::CardNotFound => "CARD_NOT_FOUND",
            ApiError::InvalidConfigKey => "INVALID_CONFIG_KEY",
            ApiError::ConfigNotFound => "CONFIG_NOT_FOUND",
            ApiError::RouteNotFound => "NOT_FOUND",
            ApiError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ApiError::MalformedBody(_) => "MALFORMED_BODY",
            ApiError::MalformedQuery(_) => "INVALID_QUERY",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken
            | ApiError::InvalidTokenFormat
            | ApiError::InvalidToken
            | ApiError::InvalidRefreshToken
            | ApiError::InvalidCredentials
            | ApiError::AccountInactive
            | ApiError::UnknownMember
            | ApiError::InvalidCurrentPassword => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::MemberNotFound
            | ApiError::CardNotFound
            | ApiError::ConfigNotFound
            | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UsernameExists => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingRefreshToken
            | ApiError::MissingCredentials
            | ApiError::WeakPassword
            | ApiError::MissingPasswords
            | ApiError::InvalidUsername
            | ApiError::FullNameTooLong
            | ApiError::InvalidStatus
            | ApiError::MissingFields
            | ApiError::TitleTooLong
            | ApiError::ContentTooLong
            | ApiError::InvalidPage
            | ApiError::InvalidLimit
            | ApiError::InvalidSort
            | ApiError::InvalidCardId
            | ApiError::InvalidMemberId
            | ApiError::InvalidConfigKey
            | ApiError::MalformedBody(_)
            | ApiError::MalformedQuery(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self, locale: Locale) -> &'static str {
        let (vi, en) = match self {
            ApiError::MissingToken => ("Access token là bắt buộc", "Access token is required"),
            ApiError::MissingRefreshToken => {
                ("Refresh token là bắt buộc", "Refresh token is required")
            }
            ApiError::InvalidTokenFormat => {
                ("Token format không hợp lệ", "Token format is invalid")
            }
            ApiError::InvalidToken => (
                "Access token không hợp lệ hoặc đã hết hạn",
                "Access token is invalid or expired",
            ),
            ApiError::InvalidRefreshToken => (
                "Refresh token không hợp lệ hoặc đã hết hạn",
                "Refresh token is invalid or expired",
            ),
            ApiError::Forbidden => (
                "Bạn không có quyền quản trị",
                "Administrator privileges are required",
            ),
            ApiError::MissingCredentials => (
                "Username và password là bắt buộc",
                "Username and password are required",
            ),
            ApiError::InvalidCredentials => (
                "Tên đăng nhập hoặc mật khẩu không đúng",
                "Incorrect username or password",
            ),
            ApiError::AccountInactive => {
                ("Tài khoản đã bị vô hiệu hóa", "This account has been deactivated")
            }
            ApiError::UnknownMember | ApiError::MemberNotFound => {
                ("Thành viên không tồn tại", "Member does not exist")
            }
            ApiError::UsernameExists => ("Username đã tồn tại", "Username already exists"),
            ApiError::WeakPassword => (
                "Password phải có ít nhất 6 ký tự",
                "Password must be at least 6 characters",
            ),
            ApiError::MissingPasswords => (
                "Current password và new password là bắt buộc",
                "Current password and new password are required",
            ),
            ApiError::InvalidCurrentPassword => {
                ("Current password không đúng", "Current password is incorrect")
            }
            ApiError::InvalidUsername => (
                "Username phải có từ 3 đến 50 ký tự",
                "Username must be between 3 and 50 characters",
            ),
            ApiError::FullNameTooLong => (
                "Họ tên không được quá 100 ký tự",
                "Full name must not exceed 100 characters",
            ),
            ApiError::InvalidStatus => (
                "Trạng thái không hợp lệ",
                "Status must be 1 (active) or 0 (inactive)",
            ),
            ApiError::MissingFields => (
                "Title và content là bắt buộc",
                "Title and content are required",
            ),
            ApiError::TitleTooLong => (
                "Title không được vượt quá 200 ký tự",
                "Title must not exceed 200 characters",
            ),
            ApiError::ContentTooLong => (
                "Content không được vượt quá 10000 ký tự",
                "Content must not exceed 10000 characters",
            ),
            ApiError::InvalidPage => ("Page phải lớn hơn 0", "Page must be greater than 0"),
            ApiError::InvalidLimit => ("Limit phải lớn hơn 0", "Limit must be greater than 0"),
            ApiError::InvalidSort => ("Tham số sort không hợp lệ", "Sort parameter is invalid"),
            ApiError::InvalidCardId => ("Card ID không hợp lệ", "Card ID is invalid"),
            ApiError::InvalidMemberId => ("Member ID không hợp lệ", "Member ID is invalid"),
            ApiError::CardNotFound => (
                "Card không tồn tại hoặc bạn không có quyền truy cập",
                "Card does not exist or you do not have access to it",
            ),
            ApiError::InvalidConfigKey => {
                ("Config key không hợp lệ", "Config key is invalid")
            }
            ApiError::ConfigNotFound => {
                ("Config key không tồn tại", "Config key does not exist")
            }
            ApiError::RouteNotFound => ("Không tìm thấy đường dẫn", "Route not found"),
            ApiError::MethodNotAllowed => {
                ("Phương thức không được hỗ trợ", "Method not allowed")
            }
            ApiError::MalformedBody(_) => {
                ("Dữ liệu gửi lên không hợp lệ", "Request body is malformed")
            }
            ApiError::MalformedQuery(_) => {
                ("Tham số truy vấn không hợp lệ", "Query string is malformed")
            }
            ApiError::Database(_) => ("Lỗi truy vấn database", "Database query failed"),
            ApiError::Internal(_) => (
                "Lỗi hệ thống, vui lòng thử lại sau",
                "Internal error, please try again later",
            ),
        };
        locale.pick(vi, en)
    }

    fn tag(&self) -> ErrorTag {
        ErrorTag {
            code: self.code(),
            vi: self.message(Locale::Vi),
            en: self.message(Locale::En),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(_) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
            }
            ApiError::MalformedBody(_) | ApiError::MalformedQuery(_) => {
                tracing::debug!(error = %self, "rejected request");
            }
            _ => {}
        }

        let tag = self.tag();
        let mut response = (
            self.status(),
            ApiResponse::failure(tag.code, tag.text(Locale::default())),
        )
            .into_response();
        response.extensions_mut().insert(tag);
        response
    }
}

/// Marks a response as an [`ApiError`] rendering so it can be re-localised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTag {
    pub code: &'static str,
    vi: &'static str,
    en: &'static str,
}

impl ErrorTag {
    pub fn text(&self, locale: Locale) -> &'static str {
        locale.pick(self.vi, self.en)
    }
}

/// Re-render error envelopes in the caller's locale.
pub async fn localize_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let locale = Locale::resolve(request.uri(), request.headers(), state.default_locale);
    let response = next.run(request).await;

    let Some(tag) = response.extensions().get::<ErrorTag>().copied() else {
        return response;
    };
    if locale == Locale::default() {
        return response;
    }

    let status = response.status();
    let mut localized =
        (status, ApiResponse::failure(tag.code, tag.text(locale))).into_response();
    localized.extensions_mut().insert(tag);
    localized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_codes_are_distinct() {
        assert_eq!(ApiError::MissingToken.code(), "MISSING_TOKEN");
        assert_eq!(ApiError::InvalidTokenFormat.code(), "INVALID_TOKEN_FORMAT");
        assert_eq!(ApiError::InvalidToken.code(), "INVALID_TOKEN");
        for err in [
            ApiError::MissingToken,
            ApiError::InvalidTokenFormat,
            ApiError::InvalidToken,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_member_not_found_status_depends_on_context() {
        assert_eq!(ApiError::UnknownMember.code(), ApiError::MemberNotFound.code());
        assert_eq!(ApiError::UnknownMember.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::MemberNotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_refresh_token_missing_is_bad_request() {
        assert_eq!(ApiError::MissingRefreshToken.code(), "MISSING_TOKEN");
        assert_eq!(ApiError::MissingRefreshToken.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_messages_are_localized() {
        let err = ApiError::InvalidCredentials;
        assert_eq!(
            err.message(Locale::Vi),
            "Tên đăng nhập hoặc mật khẩu không đúng"
        );
        assert_eq!(err.message(Locale::En), "Incorrect username or password");
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = ApiError::Internal("argon2 exploded".into());
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(!err.message(Locale::En).contains("argon2"));
    }
}
