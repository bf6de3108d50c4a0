//! # API crate: TR Flashcard back-office
//!
//! Everything the server binary serves lives here: the data model, storage,
//! authentication, business rules and the axum router.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Argon2 password hashing, HS256 access/refresh tokens, `AuthMember` / `AuthAdmin` extractors |
//! | [`db`] | `Store` trait with PostgreSQL (`PgStore`) and in-memory (`MemoryStore`) backends, pool and migrations |
//! | [`error`] | `ApiError` with wire codes, HTTP statuses and localised messages |
//! | [`i18n`] | Vietnamese / English locale resolution and status messages |
//! | [`models`] | Members, cards, config rows, dashboard counts and pagination |
//! | [`response`] | The `{ success, data, error }` envelope |
//! | [`routes`] | Member, admin and public HTTP endpoints |
//! | [`service`] | Business rules behind each endpoint |
//! | [`settings`] | Layered configuration (defaults, `config.toml`, environment) |
//! | [`state`] | Shared handler state |
//!
//! ## Endpoints
//!
//! - **Member auth**: `POST /api/auth/{login,refresh,logout}`
//! - **Member account**: `POST /api/members/{register,change-password}`, `GET /api/members/me`
//! - **Member cards**: `GET|POST /api/cards`, `GET|PUT|DELETE /api/cards/{id}`
//! - **Admin**: `/api/admin/{login,dashboard,members,cards,settings}`
//! - **Public**: `GET /api/app-name`, `GET /health`

pub mod auth;
pub mod db;
pub mod error;
pub mod i18n;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use settings::Settings;
pub use state::AppState;
