//! Back-office dashboard counts.

use chrono::{Duration, Utc};

use crate::error::ApiError;
use crate::models::DashboardStats;
use crate::state::AppState;

/// Window for the "recent" counters.
pub const RECENT_DAYS: i64 = 7;

pub async fn stats(state: &AppState) -> Result<DashboardStats, ApiError> {
    let since = Utc::now() - Duration::days(RECENT_DAYS);
    Ok(state.store.dashboard(since).await?)
}
