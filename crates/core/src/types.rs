/// Primary key type shared by every table.
pub type DbId = i64;

/// Timestamp with time zone as stored by Postgres (`TIMESTAMPTZ`).
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date (`DATE`).
pub type Date = chrono::NaiveDate;
