/// Primary key type of every table (PostgreSQL `BIGSERIAL`).
pub type DbId = i64;

/// Timestamps are stored and exchanged in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
