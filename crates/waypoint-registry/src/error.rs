use thiserror::Error;
use waypoint_core::{StoreError, ValidationError};

/// Failures from [`create_batch`][crate::LinkRegistry::create_batch].
///
/// Row indices are 1-based; any failure aborts the entire batch without
/// inserting anything.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("row {row}: {source}")]
    Validation {
        row: usize,
        #[source]
        source: ValidationError,
    },
    #[error("row {row}: code already in use: {code}")]
    DuplicateCode { row: usize, code: String },
    #[error("row {row}: failed to generate a unique code after retries")]
    CodeExhausted { row: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures from [`resolve`][crate::LinkRegistry::resolve].
///
/// `NotFound` and `Expired` drive the same user-visible outcome but stay
/// separate variants for observability.
#[derive(Debug, Clone, Error)]
pub enum RedirectError {
    #[error("no link for code '{0}'")]
    NotFound(String),
    #[error("link for code '{0}' has expired")]
    Expired(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
