//! # Member records
//!
//! [`Member`] is the full `members` row, password hash included. It never
//! leaves the server; handlers answer with one of two projections:
//!
//! - [`MemberSummary`]: `id`, `username`, `full_name`; embedded in login,
//!   refresh and register responses.
//! - [`MemberInfo`]: everything except the hash; used by the admin API and
//!   `GET /api/members/me`.
//!
//! A member is *live* when it exists, is not soft-deleted and is
//! [`MemberStatus::Active`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account status, stored as `SMALLINT` and serialised as `1` / `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i16", try_from = "i16")]
#[repr(i16)]
pub enum MemberStatus {
    Inactive = 0,
    #[default]
    Active = 1,
}

impl From<MemberStatus> for i16 {
    fn from(status: MemberStatus) -> Self {
        status as i16
    }
}

impl TryFrom<i16> for MemberStatus {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MemberStatus::Inactive),
            1 => Ok(MemberStatus::Active),
            other => Err(format!("unknown member status {other}")),
        }
    }
}

/// Full member row.
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl Member {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn to_summary(&self) -> MemberSummary {
        MemberSummary {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
        }
    }

    pub fn to_info(&self) -> MemberInfo {
        MemberInfo {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub status: MemberStatus,
}

/// Partial update; `None` leaves a column untouched. `full_name:
/// Some(None)` clears the name.
#[derive(Debug, Clone, Default)]
pub struct MemberChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub full_name: Option<Option<String>>,
    pub status: Option<MemberStatus>,
}

impl MemberChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password_hash.is_none()
            && self.full_name.is_none()
            && self.status.is_none()
    }
}

/// Filters for listing live members, newest first.
#[derive(Debug, Clone, Default)]
pub struct MemberQuery {
    /// Case-insensitive substring of `username` or `full_name`.
    pub search: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&MemberStatus::Active).unwrap(), "1");
        assert_eq!(serde_json::to_string(&MemberStatus::Inactive).unwrap(), "0");
        let parsed: MemberStatus = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, MemberStatus::Inactive);
        assert!(serde_json::from_str::<MemberStatus>("2").is_err());
    }
}
