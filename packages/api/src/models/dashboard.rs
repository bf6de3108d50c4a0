use serde::{Deserialize, Serialize};

/// Aggregate counts for the admin dashboard. Soft-deleted rows are never
/// counted; "recent" means created within the last seven days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_members: i64,
    pub total_cards: i64,
    pub recent_members: i64,
    pub recent_cards: i64,
}
