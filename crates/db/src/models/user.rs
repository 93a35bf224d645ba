//! User account model.

use serde::Serialize;
use sqlx::FromRow;
use trakker_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub company_id: DbId,
    pub username: String,
    pub employee_id: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created: Timestamp,
    pub modified: Timestamp,
}

/// DTO for creating a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub company_id: DbId,
    pub username: String,
    pub employee_id: String,
    pub password_hash: String,
    pub role: String,
}
