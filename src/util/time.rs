use chrono::{DateTime, Utc};
use sea_orm::DbErr;

/// Converts a UTC datetime to the epoch milliseconds stored in the database.
pub fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Converts stored epoch milliseconds back to a UTC datetime.
///
/// # Arguments
/// - `millis` - Milliseconds since the Unix epoch as stored in the database
///
/// # Returns
/// - `Ok(DateTime<Utc>)` - Converted timestamp
/// - `Err(DbErr::Custom)` - Value is outside chrono's representable range
pub fn from_millis(millis: i64) -> Result<DateTime<Utc>, DbErr> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        DbErr::Custom(format!(
            "Failed to convert stored timestamp {} to a UTC datetime",
            millis
        ))
    })
}

/// Converts an optional stored timestamp.
pub fn from_millis_opt(millis: Option<i64>) -> Result<Option<DateTime<Utc>>, DbErr> {
    millis.map(from_millis).transpose()
}
