//! Company (tenant) model.

use serde::Serialize;
use sqlx::FromRow;
use trakker_core::types::{DbId, Timestamp};

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub created: Timestamp,
    pub modified: Timestamp,
}
