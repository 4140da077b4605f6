use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid repository or column setup, detected while building
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed client-supplied filter or sort input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A bound value does not match the column's declared type
    #[error("Type mismatch for field `{field}`: got {value}, expected {expected}")]
    TypeMismatch {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Error from the underlying database adapter, propagated unchanged
    #[error("Execution error: {0}")]
    Execution(String),

    /// Error with transaction handling
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Error decoding a row or cache entry into an entity
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// No rows returned when at least one was expected
    #[error("No rows found")]
    NotFound,

    /// A mutation that was expected to change rows changed none
    #[error("No rows affected")]
    NoRowsAffected,
}

/// Result type for query building and execution
pub type Result<T> = core::result::Result<T, Error>;
