//! Custom error types for the common library
//!
//! This module defines the error types raised by the storage engine and the
//! PostgreSQL connection layer.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database connectivity
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred while creating the schema
    #[error("Database migration error: {0}")]
    Migration(#[source] SqlxError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Error raised by a storage backend
///
/// A missing id is never an error; lookups return `None` instead.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the storage file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage file could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A relational backend query failed
    #[error("Storage query error: {0}")]
    Query(#[from] SqlxError),

    /// Database setup failed
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A stored record does not have the expected shape
    #[error("Unexpected record: {0}")]
    UnexpectedRecord(String),

    /// A password could not be hashed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;
