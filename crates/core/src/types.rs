/// Users keep the BIGSERIAL key of the identity table.
pub type UserId = i64;

/// Every story-writing entity is keyed by an opaque, globally unique id.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
