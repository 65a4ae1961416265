use thiserror::Error;

/// Validation failures for user-supplied batch input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid validity: {0}")]
    InvalidValidity(String),
    #[error("invalid short code: {0}")]
    InvalidCodeFormat(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by a [`LinkStore`][crate::LinkStore] implementation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A record with the same code is already live. The registry checks
    /// before inserting, so hitting this indicates a caller bug.
    #[error("code already exists: {0}")]
    Conflict(String),
    #[error("stored data is invalid: {0}")]
    Serialization(String),
    #[error("storage backend failed: {0}")]
    Backend(String),
}
