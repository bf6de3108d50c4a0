//! Flashcards and the filters used to list them.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full card row.
#[derive(Debug, Clone, FromRow)]
pub struct Card {
    pub id: Uuid,
    pub member_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl Card {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn to_info(&self) -> CardInfo {
        CardInfo {
            id: self.id,
            member_id: self.member_id,
            title: self.title.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    pub id: Uuid,
    pub member_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub member_id: Uuid,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct CardChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
        }
    }
}

/// `<field>.<asc|desc>`, e.g. `created_at.desc` (the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSort {
    pub field: SortField,
    pub ascending: bool,
}

impl Default for CardSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            ascending: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort expression: {0}")]
pub struct InvalidSort(pub String);

impl FromStr for CardSort {
    type Err = InvalidSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = s.split_once('.').unwrap_or((s, "desc"));
        let field = match field {
            "created_at" => SortField::CreatedAt,
            "updated_at" => SortField::UpdatedAt,
            "title" => SortField::Title,
            _ => return Err(InvalidSort(s.to_string())),
        };
        let ascending = match order {
            "asc" => true,
            "desc" => false,
            _ => return Err(InvalidSort(s.to_string())),
        };
        Ok(Self { field, ascending })
    }
}

/// Filters for listing live cards.
#[derive(Debug, Clone, Default)]
pub struct CardQuery {
    /// Restrict to one owner; `None` lists every member's cards.
    pub member_id: Option<Uuid>,
    /// Case-insensitive substring of `title` or `content`.
    pub search: Option<String>,
    pub sort: CardSort,
    pub offset: u64,
    pub limit: u64,
}
