/// Identifier of a district in the model's training data.
pub type DistrictId = i64;

/// Identifier of a city in the model's training data.
pub type CityId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
