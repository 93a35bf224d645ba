//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where the entity is mutable

pub mod audit;
pub mod company;
pub mod evaluation;
pub mod role_level;
pub mod scorecard;
pub mod template;
pub mod user;
