//! Error types for the chat service.

use huddle_auth::AuthError;
use huddle_database::DatabaseError;
use thiserror::Error;

pub type ChatResult<T> = Result<T, ChatError>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything a chat operation can fail with.
///
/// The display text of each variant is what callers get to see, so it never
/// carries store internals.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{message}")]
    Validation { message: String },

    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error("{reason}")]
    Forbidden { reason: String },

    #[error("chat {id} not found")]
    NotFound { id: i64 },

    #[error("{message}")]
    Store { message: String },
}

impl ChatError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

/// Failures reported by a [`crate::ChatStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("chat insert failed: {0}")]
    ChatInsert(String),

    #[error("member insert failed: {0}")]
    MemberInsert(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ChatInsertFailed(message) => StoreError::ChatInsert(message),
            DatabaseError::MemberInsertFailed(message) => StoreError::MemberInsert(message),
            other => StoreError::Backend(other.to_string()),
        }
    }
}
