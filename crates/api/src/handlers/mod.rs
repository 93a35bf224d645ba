//! Request handlers.
//!
//! Each submodule serves one resource family. Tenant-scoped handlers take
//! [`crate::middleware::auth::AuthUser`] first, read their parameters
//! through [`crate::payload::Payload`], delegate to the repositories in
//! `trakker_db` and map errors via [`crate::error::AppError`].

pub mod audit;
pub mod auth;
pub mod evaluations;
pub mod role_levels;
pub mod scorecards;
pub mod templates;
