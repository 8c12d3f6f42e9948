// Error types for database operations

use thiserror::Error;

/// Error types for database connection and query operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Error occurred while opening the connection
    #[error("{0}")]
    ConnectionError(String),

    /// Error occurred during query execution
    #[error("{0}")]
    QueryError(String),

    /// The query produced no row to read a value from
    #[error("query returned no rows")]
    NoRows,
}

impl From<sea_orm::DbErr> for DbError {
    fn from(err: sea_orm::DbErr) -> Self {
        DbError::QueryError(err.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::ConnectionError(err.to_string())
    }
}
