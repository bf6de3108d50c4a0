//! # Database module: storage behind the [`Store`] trait
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Store`] | async persistence trait used by every service |
//! | [`PgStore`] | PostgreSQL implementation (sqlx) |
//! | [`MemoryStore`] | in-process implementation for tests |
//! | [`connect`] / [`migrate`] | pool creation and schema migrations |

mod memory;
mod pool;
mod postgres;
mod store;

pub use memory::MemoryStore;
pub use pool::{connect, migrate};
pub use postgres::PgStore;
pub use store::{Store, StoreError};
