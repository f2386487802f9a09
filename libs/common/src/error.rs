//! Custom error types for the common library
//!
//! This module defines the database error types used throughout the
//! application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during schema migration
    #[error("Database migration error: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_display() {
        let err = DatabaseError::Query(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Database query error"));
    }

    #[test]
    fn test_configuration_error_display() {
        let err = DatabaseError::Configuration("bad URL".to_string());
        assert_eq!(err.to_string(), "Database configuration error: bad URL");
    }
}
