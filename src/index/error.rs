//! Index error types
//!
//! Mutations work on in-memory structures only, so the only failures are
//! records that should never have reached the index.

use thiserror::Error;

/// Errors that can occur when mutating the index
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexError {
    /// Record has an empty id and cannot be keyed
    #[error("Record has an empty id")]
    EmptyId,
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
