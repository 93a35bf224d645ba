//! Domain logic for role levels, scorecards and scorecard evaluations.
//!
//! Nothing in this crate performs I/O. Repositories live in `trakker_db`
//! and the HTTP surface in `trakker_api`; both call into the validation,
//! coercion and extraction helpers defined here.

pub mod audit;
pub mod coerce;
pub mod dates;
pub mod document;
pub mod error;
pub mod evaluation;
pub mod messages;
pub mod pagination;
pub mod role_level;
pub mod sanitize;
pub mod scorecard;
pub mod search;
pub mod template;
pub mod types;
pub mod unique_id;
