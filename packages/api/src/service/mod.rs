//! # Services: business rules independent of HTTP
//!
//! | Module | Operations |
//! |--------|------------|
//! | [`accounts`] | member login / refresh / register / change password, admin login |
//! | [`cards`] | card list / get / create / update / delete for members and the admin |
//! | [`members`] | admin member CRUD |
//! | [`dashboard`] | aggregate counts |
//! | [`system_config`] | settings list / get / upsert, application name |
//!
//! Every function takes the shared [`AppState`](crate::state::AppState) and
//! returns an [`ApiError`](crate::error::ApiError) carrying the wire code.

pub mod accounts;
pub mod cards;
pub mod dashboard;
pub mod members;
pub mod system_config;
pub mod validate;
