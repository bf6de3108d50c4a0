//! # Store: the persistence seam
//!
//! Services talk to storage only through the [`Store`] trait, so the same
//! business rules run against PostgreSQL ([`PgStore`](super::PgStore)) in
//! production and against [`MemoryStore`](super::MemoryStore) in tests.
//!
//! ## Soft deletes
//!
//! Members and cards are never removed. Deleting stamps `deleted_at` and
//! `deleted_by`; from then on:
//!
//! - `member_by_id` / `member_by_username` still return the row (login and
//!   registration need to see it), but callers must check
//!   [`Member::is_deleted`];
//! - every other read, update and delete skips deleted rows, so a second
//!   delete reports "not found".
//!
//! ## Ownership
//!
//! Card operations take `owner: Option<Uuid>`. `Some(id)` restricts the
//! operation to that member's cards (member API); `None` is the admin scope.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Card, CardChanges, CardQuery, ConfigEntry, DashboardStats, Member, MemberChanges,
    MemberQuery, NewCard, NewMember,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A unique constraint rejected the write.
    #[error("conflict on {0}")]
    Conflict(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    // members

    async fn member_by_id(&self, id: Uuid) -> Result<Option<Member>, StoreError>;

    async fn member_by_username(&self, username: &str) -> Result<Option<Member>, StoreError>;

    /// Live members matching the query, newest first, plus the total count.
    async fn list_members(&self, query: &MemberQuery) -> Result<(Vec<Member>, u64), StoreError>;

    /// Fails with [`StoreError::Conflict`] when the username is taken.
    async fn insert_member(&self, new: NewMember) -> Result<Member, StoreError>;

    async fn update_member(
        &self,
        id: Uuid,
        changes: MemberChanges,
    ) -> Result<Option<Member>, StoreError>;

    async fn soft_delete_member(&self, id: Uuid, actor: &str) -> Result<bool, StoreError>;

    // cards

    async fn card_by_id(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Card>, StoreError>;

    async fn list_cards(&self, query: &CardQuery) -> Result<(Vec<Card>, u64), StoreError>;

    async fn insert_card(&self, new: NewCard) -> Result<Card, StoreError>;

    async fn update_card(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        changes: CardChanges,
    ) -> Result<Option<Card>, StoreError>;

    async fn soft_delete_card(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        actor: &str,
    ) -> Result<bool, StoreError>;

    // system config

    async fn config_get(&self, key: &str) -> Result<Option<ConfigEntry>, StoreError>;

    /// All entries ordered by key.
    async fn config_list(&self) -> Result<Vec<ConfigEntry>, StoreError>;

    async fn config_insert(&self, key: &str, value: &str) -> Result<ConfigEntry, StoreError>;

    async fn config_update(&self, key: &str, value: &str)
        -> Result<Option<ConfigEntry>, StoreError>;

    // dashboard

    /// Live-row counts; "recent" rows were created at or after `since`.
    async fn dashboard(&self, since: DateTime<Utc>) -> Result<DashboardStats, StoreError>;
}
