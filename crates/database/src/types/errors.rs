//! Error types for the database layer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    /// The chat row itself could not be written.
    #[error("Chat insert failed: {0}")]
    ChatInsertFailed(String),

    /// One of the membership rows was rejected, usually an unknown account id.
    #[error("Member insert failed: {0}")]
    MemberInsertFailed(String),
}

impl DatabaseError {
    pub(crate) fn query(err: sqlx::Error) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}
