/// Dish identifiers are UUIDs assigned by the store.
pub type DishId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
