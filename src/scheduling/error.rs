use thiserror::Error;

use crate::db::DatabaseError;

/// Failure taxonomy of the scheduling core. The HTTP layer maps these onto
/// status codes in `crate::error`; nothing here is silently defaulted.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    #[error("Requested window overlaps an existing reservation")]
    Conflict,

    #[error("Actor is not allowed to perform this transition")]
    Forbidden,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}
