use chrono::{DateTime, Utc};
use thiserror::Error;

/// Internal issues indicating unexpected store state or possible bugs.
#[derive(Error, Debug, PartialEq)]
pub enum InternalError {
    /// A row a write just reported as present could not be read back.
    #[error("{entity} {key} was not found after it was written")]
    MissingAfterWrite {
        /// Kind of record
        entity: &'static str,
        /// Key of the record
        key: String,
    },

    /// Adding days to a timestamp left chrono's representable range.
    #[error("Date arithmetic overflowed from {from}")]
    DateOverflow {
        /// Timestamp the days were added to
        from: DateTime<Utc>,
    },
}
