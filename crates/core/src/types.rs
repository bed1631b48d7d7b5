/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Identifier for a stored week template.
pub type TemplateId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
