use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::store::{Store, StoreError};
use crate::models::{
    Card, CardChanges, CardQuery, ConfigEntry, DashboardStats, Member, MemberChanges,
    MemberQuery, NewCard, NewMember, SortField,
};

#[derive(Debug, Default)]
struct Tables {
    members: Vec<Member>,
    cards: Vec<Card>,
    config: Vec<ConfigEntry>,
}

/// In-memory Store for tests and database-less local runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page<T: Clone>(rows: Vec<&T>, offset: u64, limit: u64) -> (Vec<T>, u64) {
    let total = rows.len() as u64;
    let rows = rows
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect();
    (rows, total)
}

fn owned_by(card: &Card, owner: Option<Uuid>) -> bool {
    owner.map_or(true, |owner| card.member_id == owner)
}

#[async_trait]
impl Store for MemoryStore {
    async fn member_by_id(&self, id: Uuid) -> Result<Option<Member>, StoreError> {
        Ok(self.tables().members.iter().find(|m| m.id == id).cloned())
    }

    async fn member_by_username(&self, username: &str) -> Result<Option<Member>, StoreError> {
        Ok(self
            .tables()
            .members
            .iter()
            .find(|m| m.username == username)
            .cloned())
    }

    async fn list_members(&self, query: &MemberQuery) -> Result<(Vec<Member>, u64), StoreError> {
        let tables = self.tables();
        let mut rows: Vec<&Member> = tables
            .members
            .iter()
            .filter(|m| !m.is_deleted())
            .filter(|m| match &query.search {
                Some(search) => {
                    contains_ci(&m.username, search)
                        || m.full_name.as_deref().is_some_and(|n| contains_ci(n, search))
                }
                None => true,
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(rows, query.offset, query.limit))
    }

    async fn insert_member(&self, new: NewMember) -> Result<Member, StoreError> {
        let mut tables = self.tables();
        if tables.members.iter().any(|m| m.username == new.username) {
            return Err(StoreError::Conflict("members.username".into()));
        }
        let now = Utc::now();
        let member = Member {
            id: Uuid::new_v4(),
            username: new.username,
            password_hash: new.password_hash,
            full_name: new.full_name,
            status: new.status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        };
        tables.members.push(member.clone());
        Ok(member)
    }

    async fn update_member(
        &self,
        id: Uuid,
        changes: MemberChanges,
    ) -> Result<Option<Member>, StoreError> {
        let mut tables = self.tables();
        if let Some(username) = &changes.username {
            if tables
                .members
                .iter()
                .any(|m| m.id != id && &m.username == username)
            {
                return Err(StoreError::Conflict("members.username".into()));
            }
        }

        let Some(member) = tables
            .members
            .iter_mut()
            .find(|m| m.id == id && !m.is_deleted())
        else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            member.username = username;
        }
        if let Some(hash) = changes.password_hash {
            member.password_hash = hash;
        }
        if let Some(full_name) = changes.full_name {
            member.full_name = full_name;
        }
        if let Some(status) = changes.status {
            member.status = status;
        }
        member.updated_at = Utc::now();
        Ok(Some(member.clone()))
    }

    async fn soft_delete_member(&self, id: Uuid, actor: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        match tables
            .members
            .iter_mut()
            .find(|m| m.id == id && !m.is_deleted())
        {
            Some(member) => {
                member.deleted_at = Some(Utc::now());
                member.deleted_by = Some(actor.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn card_by_id(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Card>, StoreError> {
        Ok(self
            .tables()
            .cards
            .iter()
            .find(|c| c.id == id && !c.is_deleted() && owned_by(c, owner))
            .cloned())
    }

    async fn list_cards(&self, query: &CardQuery) -> Result<(Vec<Card>, u64), StoreError> {
        let tables = self.tables();
        let mut rows: Vec<&Card> = tables
            .cards
            .iter()
            .filter(|c| !c.is_deleted() && owned_by(c, query.member_id))
            .filter(|c| match &query.search {
                Some(search) => contains_ci(&c.title, search) || contains_ci(&c.content, search),
                None => true,
            })
            .collect();

        rows.sort_by(|a, b| {
            let ordering: Ordering = match query.sort.field {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortField::Title => a.title.cmp(&b.title),
            };
            if query.sort.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        Ok(page(rows, query.offset, query.limit))
    }

    async fn insert_card(&self, new: NewCard) -> Result<Card, StoreError> {
        let now = Utc::now();
        let card = Card {
            id: Uuid::new_v4(),
            member_id: new.member_id,
            title: new.title,
            content: new.content,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        };
        self.tables().cards.push(card.clone());
        Ok(card)
    }

    async fn update_card(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        changes: CardChanges,
    ) -> Result<Option<Card>, StoreError> {
        let mut tables = self.tables();
        let Some(card) = tables
            .cards
            .iter_mut()
            .find(|c| c.id == id && !c.is_deleted() && owned_by(c, owner))
        else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            card.title = title;
        }
        if let Some(content) = changes.content {
            card.content = content;
        }
        card.updated_at = Utc::now();
        Ok(Some(card.clone()))
    }

    async fn soft_delete_card(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        actor: &str,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        match tables
            .cards
            .iter_mut()
            .find(|c| c.id == id && !c.is_deleted() && owned_by(c, owner))
        {
            Some(card) => {
                card.deleted_at = Some(Utc::now());
                card.deleted_by = Some(actor.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn config_get(&self, key: &str) -> Result<Option<ConfigEntry>, StoreError> {
        Ok(self
            .tables()
            .config
            .iter()
            .find(|e| e.config_key == key)
            .cloned())
    }

    async fn config_list(&self) -> Result<Vec<ConfigEntry>, StoreError> {
        let mut entries = self.tables().config.clone();
        entries.sort_by(|a, b| a.config_key.cmp(&b.config_key));
        Ok(entries)
    }

    async fn config_insert(&self, key: &str, value: &str) -> Result<ConfigEntry, StoreError> {
        let mut tables = self.tables();
        if tables.config.iter().any(|e| e.config_key == key) {
            return Err(StoreError::Conflict("system_config.config_key".into()));
        }
        let now = Utc::now();
        let entry = ConfigEntry {
            id: Uuid::new_v4(),
            config_key: key.to_string(),
            config_value: value.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.config.push(entry.clone());
        Ok(entry)
    }

    async fn config_update(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<ConfigEntry>, StoreError> {
        let mut tables = self.tables();
        let Some(entry) = tables.config.iter_mut().find(|e| e.config_key == key) else {
            return Ok(None);
        };
        entry.config_value = value.to_string();
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn dashboard(&self, since: DateTime<Utc>) -> Result<DashboardStats, StoreError> {
        let tables = self.tables();
        let live_members = tables.members.iter().filter(|m| !m.is_deleted());
        let live_cards = tables.cards.iter().filter(|c| !c.is_deleted());

        Ok(DashboardStats {
            total_members: live_members.clone().count() as i64,
            total_cards: live_cards.clone().count() as i64,
            recent_members: live_members.filter(|m| m.created_at >= since).count() as i64,
            recent_cards: live_cards.filter(|c| c.created_at >= since).count() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardSort, MemberStatus};

    fn new_member(username: &str) -> NewMember {
        NewMember {
            username: username.into(),
            password_hash: "hash".into(),
            full_name: None,
            status: MemberStatus::Active,
        }
    }

    fn new_card(member_id: Uuid, title: &str) -> NewCard {
        NewCard {
            member_id,
            title: title.into(),
            content: format!("{title} content"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.insert_member(new_member("lan")).await.unwrap();
        assert!(matches!(
            store.insert_member(new_member("lan")).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_soft_deleted_member_is_hidden_from_listing() {
        let store = MemoryStore::new();
        let lan = store.insert_member(new_member("lan")).await.unwrap();
        store.insert_member(new_member("minh")).await.unwrap();

        assert!(store.soft_delete_member(lan.id, "admin:root").await.unwrap());
        assert!(!store.soft_delete_member(lan.id, "admin:root").await.unwrap());

        let query = MemberQuery { limit: 10, ..Default::default() };
        let (members, total) = store.list_members(&query).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(members[0].username, "minh");

        // Still visible to lookups, flagged as deleted.
        let lan = store.member_by_id(lan.id).await.unwrap().unwrap();
        assert!(lan.is_deleted());
        assert_eq!(lan.deleted_by.as_deref(), Some("admin:root"));
        assert!(store
            .update_member(lan.id, MemberChanges::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_card_ownership_scopes() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let card = store.insert_card(new_card(owner, "merhaba")).await.unwrap();

        assert!(store.card_by_id(card.id, Some(owner)).await.unwrap().is_some());
        assert!(store.card_by_id(card.id, None).await.unwrap().is_some());
        assert!(store.card_by_id(card.id, Some(stranger)).await.unwrap().is_none());
        assert!(!store
            .soft_delete_card(card.id, Some(stranger), &stranger.to_string())
            .await
            .unwrap());
        assert!(store
            .soft_delete_card(card.id, Some(owner), &owner.to_string())
            .await
            .unwrap());
        assert!(store.card_by_id(card.id, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_cards_search_sort_and_page() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for title in ["cat", "apple", "banana"] {
            store.insert_card(new_card(owner, title)).await.unwrap();
        }
        store.insert_card(new_card(Uuid::new_v4(), "avocado")).await.unwrap();

        let query = CardQuery {
            member_id: Some(owner),
            sort: "title.asc".parse::<CardSort>().unwrap(),
            limit: 2,
            ..Default::default()
        };
        let (cards, total) = store.list_cards(&query).await.unwrap();
        assert_eq!(total, 3);
        let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["apple", "banana"]);

        let query = CardQuery {
            search: Some("AN".into()),
            limit: 10,
            ..Default::default()
        };
        let (cards, total) = store.list_cards(&query).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(cards[0].title, "banana");
    }

    #[tokio::test]
    async fn test_config_insert_then_update() {
        let store = MemoryStore::new();
        store.config_insert("app_name", "TR Flashcard").await.unwrap();
        assert!(store.config_insert("app_name", "again").await.is_err());
        let entry = store.config_update("app_name", "Flashcards").await.unwrap().unwrap();
        assert_eq!(entry.config_value, "Flashcards");
        assert!(store.config_update("missing", "x").await.unwrap().is_none());
    }
}
