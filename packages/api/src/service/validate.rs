//! Input normalisation shared by the services.

use std::str::FromStr;

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CardSort, MemberStatus, PageRequest};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;
pub const FULL_NAME_MAX: usize = 100;
pub const TITLE_MAX: usize = 200;
pub const CONTENT_MAX: usize = 10_000;
pub const CONFIG_KEY_MAX: usize = 100;

/// Trimmed value, or `None` when absent or blank.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn username(value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    let len = value.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) || value.chars().any(char::is_whitespace) {
        return Err(ApiError::InvalidUsername);
    }
    Ok(value.to_string())
}

pub fn new_password(value: &str) -> Result<(), ApiError> {
    if value.chars().count() < PASSWORD_MIN {
        return Err(ApiError::WeakPassword);
    }
    Ok(())
}

/// Blank names are stored as NULL.
pub fn full_name(value: Option<String>) -> Result<Option<String>, ApiError> {
    match present(value) {
        Some(name) if name.chars().count() > FULL_NAME_MAX => Err(ApiError::FullNameTooLong),
        name => Ok(name),
    }
}

pub fn status(value: Option<i16>) -> Result<Option<MemberStatus>, ApiError> {
    value
        .map(|v| MemberStatus::try_from(v).map_err(|_| ApiError::InvalidStatus))
        .transpose()
}

pub fn title(value: String) -> Result<String, ApiError> {
    if value.chars().count() > TITLE_MAX {
        return Err(ApiError::TitleTooLong);
    }
    Ok(value)
}

pub fn content(value: String) -> Result<String, ApiError> {
    if value.chars().count() > CONTENT_MAX {
        return Err(ApiError::ContentTooLong);
    }
    Ok(value)
}

/// `page` defaults to 1 and must be in `1..=PageRequest::MAX_PAGE`. `limit`
/// defaults to 10, must be positive and is clamped to 100.
pub fn page(page: Option<&str>, limit: Option<&str>) -> Result<PageRequest, ApiError> {
    let page = match page.map(str::trim).filter(|p| !p.is_empty()) {
        None => 1,
        Some(raw) => match raw.parse::<u64>() {
            Ok(n) if (1..=PageRequest::MAX_PAGE).contains(&n) => n,
            _ => return Err(ApiError::InvalidPage),
        },
    };
    let limit = match limit.map(str::trim).filter(|l| !l.is_empty()) {
        None => PageRequest::DEFAULT_LIMIT,
        Some(raw) => match raw.parse::<u64>() {
            Ok(n) if n >= 1 => n.min(PageRequest::MAX_LIMIT),
            _ => return Err(ApiError::InvalidLimit),
        },
    };
    Ok(PageRequest { page, limit })
}

pub fn sort(value: Option<&str>) -> Result<CardSort, ApiError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(CardSort::default()),
        Some(raw) => CardSort::from_str(raw).map_err(|_| ApiError::InvalidSort),
    }
}

pub fn card_id(value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value.trim()).map_err(|_| ApiError::InvalidCardId)
}

pub fn member_id(value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value.trim()).map_err(|_| ApiError::InvalidMemberId)
}

/// Keys are lowercase ASCII letters, digits, `_`, `.` and `-`.
pub fn config_key(value: &str) -> Result<String, ApiError> {
    let key = value.trim();
    let valid = !key.is_empty()
        && key.len() <= CONFIG_KEY_MAX
        && key
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-'));
    if !valid {
        return Err(ApiError::InvalidConfigKey);
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortField;

    #[test]
    fn test_present_trims() {
        assert_eq!(present(Some("  xin chào ".into())), Some("xin chào".into()));
        assert_eq!(present(Some("   ".into())), None);
        assert_eq!(present(None), None);
    }

    #[test]
    fn test_username_bounds() {
        assert!(matches!(username("ab"), Err(ApiError::InvalidUsername)));
        assert!(matches!(username("has space"), Err(ApiError::InvalidUsername)));
        assert!(matches!(username(&"x".repeat(51)), Err(ApiError::InvalidUsername)));
        assert_eq!(username(" lan ").unwrap(), "lan");
    }

    #[test]
    fn test_password_strength() {
        assert!(matches!(new_password("12345"), Err(ApiError::WeakPassword)));
        assert!(new_password("123456").is_ok());
    }

    #[test]
    fn test_card_lengths_count_characters() {
        assert!(title("ế".repeat(200)).is_ok());
        assert!(matches!(title("a".repeat(201)), Err(ApiError::TitleTooLong)));
        assert!(content("a".repeat(10_000)).is_ok());
        assert!(matches!(content("a".repeat(10_001)), Err(ApiError::ContentTooLong)));
    }

    #[test]
    fn test_page_defaults_and_clamp() {
        let request = page(None, None).unwrap();
        assert_eq!((request.page, request.limit), (1, 10));

        let request = page(Some("3"), Some("500")).unwrap();
        assert_eq!((request.page, request.limit), (3, 100));

        assert!(matches!(page(Some("0"), None), Err(ApiError::InvalidPage)));
        assert!(matches!(page(Some("-1"), None), Err(ApiError::InvalidPage)));
        assert!(matches!(page(None, Some("0")), Err(ApiError::InvalidLimit)));
        assert!(matches!(page(None, Some("ten")), Err(ApiError::InvalidLimit)));
    }

    #[test]
    fn test_page_upper_bound() {
        let max = PageRequest::MAX_PAGE.to_string();
        let request = page(Some(&max), Some("100")).unwrap();
        assert!(i64::try_from(request.offset()).is_ok());

        let over = (PageRequest::MAX_PAGE + 1).to_string();
        assert!(matches!(page(Some(&over), None), Err(ApiError::InvalidPage)));
        assert!(matches!(
            page(Some("18446744073709551615"), Some("100")),
            Err(ApiError::InvalidPage)
        ));
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(sort(None).unwrap(), CardSort::default());
        let parsed = sort(Some("title.asc")).unwrap();
        assert_eq!(parsed.field, SortField::Title);
        assert!(parsed.ascending);
        assert!(matches!(sort(Some("password.asc")), Err(ApiError::InvalidSort)));
    }

    #[test]
    fn test_config_key() {
        assert_eq!(config_key(" app_name ").unwrap(), "app_name");
        assert!(matches!(config_key(""), Err(ApiError::InvalidConfigKey)));
        assert!(matches!(config_key("App Name"), Err(ApiError::InvalidConfigKey)));
    }

    #[test]
    fn test_status() {
        assert_eq!(status(Some(0)).unwrap(), Some(MemberStatus::Inactive));
        assert_eq!(status(None).unwrap(), None);
        assert!(matches!(status(Some(2)), Err(ApiError::InvalidStatus)));
    }
}
