//! Records persisted by the store and the projections sent to clients.

mod card;
mod dashboard;
mod member;
mod page;
mod system_config;

pub use card::{Card, CardChanges, CardInfo, CardQuery, CardSort, NewCard, SortField};
pub use dashboard::DashboardStats;
pub use member::{
    Member, MemberChanges, MemberInfo, MemberQuery, MemberStatus, MemberSummary, NewMember,
};
pub use page::{PageRequest, Pagination};
pub use system_config::ConfigEntry;
