//! PostgreSQL implementation of [`Store`].
//!
//! Static queries use `sqlx::query_as` with positional binds. The list
//! queries are assembled with [`QueryBuilder`] because their filters are
//! optional; the `ORDER BY` column comes from [`SortField::column`], never
//! from client input.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::store::{Store, StoreError};
use crate::models::{
    Card, CardChanges, CardQuery, ConfigEntry, DashboardStats, Member, MemberChanges,
    MemberQuery, NewCard, NewMember,
};

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map unique-constraint violations to [`StoreError::Conflict`].
fn conflict_or(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(db.constraint().unwrap_or("unique").to_string());
        }
    }
    StoreError::Database(err)
}

/// Escape `%`, `_` and `\` so user search text matches literally in ILIKE.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_member_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &MemberQuery) {
    builder.push(" WHERE deleted_at IS NULL");
    if let Some(search) = &query.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR full_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn push_card_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &CardQuery) {
    builder.push(" WHERE deleted_at IS NULL");
    if let Some(member_id) = query.member_id {
        builder.push(" AND member_id = ").push_bind(member_id);
    }
    if let Some(search) = &query.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR content ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl Store for PgStore {
    async fn member_by_id(&self, id: Uuid) -> Result<Option<Member>, StoreError> {
        Ok(sqlx::query_as("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn member_by_username(&self, username: &str) -> Result<Option<Member>, StoreError> {
        Ok(sqlx::query_as("SELECT * FROM members WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_members(&self, query: &MemberQuery) -> Result<(Vec<Member>, u64), StoreError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM members");
        push_member_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM members");
        push_member_filters(&mut select, query);
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(to_i64(query.limit))
            .push(" OFFSET ")
            .push_bind(to_i64(query.offset));
        let members: Vec<Member> = select.build_query_as().fetch_all(&self.pool).await?;

        Ok((members, total.max(0) as u64))
    }

    async fn insert_member(&self, new: NewMember) -> Result<Member, StoreError> {
        sqlx::query_as(
            "INSERT INTO members (id, username, password_hash, full_name, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.full_name)
        .bind(new.status)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_or)
    }

    async fn update_member(
        &self,
        id: Uuid,
        changes: MemberChanges,
    ) -> Result<Option<Member>, StoreError> {
        let clear_full_name = matches!(changes.full_name, Some(None));
        let full_name = changes.full_name.flatten();

        sqlx::query_as(
            "UPDATE members SET
                username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                full_name = CASE WHEN $4 THEN NULL ELSE COALESCE($5, full_name) END,
                status = COALESCE($6, status),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.password_hash)
        .bind(clear_full_name)
        .bind(&full_name)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict_or)
    }

    async fn soft_delete_member(&self, id: Uuid, actor: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE members SET deleted_at = NOW(), deleted_by = $2
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(actor)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn card_by_id(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Card>, StoreError> {
        Ok(sqlx::query_as(
            "SELECT * FROM cards
             WHERE id = $1 AND ($2::uuid IS NULL OR member_id = $2) AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_cards(&self, query: &CardQuery) -> Result<(Vec<Card>, u64), StoreError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM cards");
        push_card_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM cards");
        push_card_filters(&mut select, query);
        select
            .push(" ORDER BY ")
            .push(query.sort.field.column())
            .push(if query.sort.ascending { " ASC" } else { " DESC" })
            .push(" LIMIT ")
            .push_bind(to_i64(query.limit))
            .push(" OFFSET ")
            .push_bind(to_i64(query.offset));
        let cards: Vec<Card> = select.build_query_as().fetch_all(&self.pool).await?;

        Ok((cards, total.max(0) as u64))
    }

    async fn insert_card(&self, new: NewCard) -> Result<Card, StoreError> {
        Ok(sqlx::query_as(
            "INSERT INTO cards (id, member_id, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(new.member_id)
        .bind(&new.title)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_card(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        changes: CardChanges,
    ) -> Result<Option<Card>, StoreError> {
        Ok(sqlx::query_as(
            "UPDATE cards SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = NOW()
             WHERE id = $1 AND ($2::uuid IS NULL OR member_id = $2) AND deleted_at IS NULL
             RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(&changes.title)
        .bind(&changes.content)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn soft_delete_card(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        actor: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE cards SET deleted_at = NOW(), deleted_by = $3
             WHERE id = $1 AND ($2::uuid IS NULL OR member_id = $2) AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner)
        .bind(actor)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn config_get(&self, key: &str) -> Result<Option<ConfigEntry>, StoreError> {
        Ok(sqlx::query_as("SELECT * FROM system_config WHERE config_key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn config_list(&self) -> Result<Vec<ConfigEntry>, StoreError> {
        Ok(sqlx::query_as("SELECT * FROM system_config ORDER BY config_key")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn config_insert(&self, key: &str, value: &str) -> Result<ConfigEntry, StoreError> {
        sqlx::query_as(
            "INSERT INTO system_config (id, config_key, config_value)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_or)
    }

    async fn config_update(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<ConfigEntry>, StoreError> {
        Ok(sqlx::query_as(
            "UPDATE system_config SET config_value = $2, updated_at = NOW()
             WHERE config_key = $1
             RETURNING *",
        )
        .bind(key)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn dashboard(&self, since: DateTime<Utc>) -> Result<DashboardStats, StoreError> {
        let (total_members, total_cards, recent_members, recent_cards): (i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT
                    (SELECT COUNT(*) FROM members WHERE deleted_at IS NULL),
                    (SELECT COUNT(*) FROM cards WHERE deleted_at IS NULL),
                    (SELECT COUNT(*) FROM members WHERE deleted_at IS NULL AND created_at >= $1),
                    (SELECT COUNT(*) FROM cards WHERE deleted_at IS NULL AND created_at >= $1)",
            )
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardStats {
            total_members,
            total_cards,
            recent_members,
            recent_cards,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("merhaba"), "%merhaba%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_card_list_sql() {
        let query = CardQuery {
            member_id: Some(Uuid::nil()),
            search: Some("x".into()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::new("SELECT * FROM cards");
        push_card_filters(&mut builder, &query);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM cards WHERE deleted_at IS NULL AND member_id = $1 \
             AND (title ILIKE $2 OR content ILIKE $3)"
        );
    }
}
