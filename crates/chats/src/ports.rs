//! Collaborators the chat service is built against.
//!
//! Implementations live in [`crate::repositories`]; the service only ever sees
//! these traits.

use std::future::Future;

use huddle_auth::{Account, AuthError};
use huddle_database::{Chat, ChatMember, NewChat};

use crate::types::StoreResult;

/// Durable storage for the chat aggregate.
///
/// Every method is atomic on its own. In particular
/// `create_chat_with_members` either stores the chat together with its whole
/// roster or stores nothing.
pub trait ChatStore: Send + Sync {
    fn create_chat_with_members(
        &self,
        new_chat: NewChat,
    ) -> impl Future<Output = StoreResult<Chat>> + Send;

    fn chats_for_account(&self, account_id: i64)
        -> impl Future<Output = StoreResult<Vec<Chat>>> + Send;

    fn find_chat(&self, chat_id: i64) -> impl Future<Output = StoreResult<Option<Chat>>> + Send;

    /// `Ok(false)` when the chat was already gone.
    fn delete_chat(&self, chat_id: i64) -> impl Future<Output = StoreResult<bool>> + Send;

    fn members(&self, chat_id: i64) -> impl Future<Output = StoreResult<Vec<ChatMember>>> + Send;
}

/// Resolves a bearer token to the account behind it.
pub trait AuthProvider: Send + Sync {
    fn verify_token(&self, token: &str) -> impl Future<Output = Result<Account, AuthError>> + Send;
}
