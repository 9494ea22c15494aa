//! Ports over the SQLite repository and the session authenticator.

use huddle_auth::{Account, AuthError, Authenticator};
use huddle_database::{Chat, ChatMember, ChatRepository, NewChat};

use crate::ports::{AuthProvider, ChatStore};
use crate::types::StoreResult;

impl ChatStore for ChatRepository {
    async fn create_chat_with_members(&self, new_chat: NewChat) -> StoreResult<Chat> {
        Ok(ChatRepository::create_chat_with_members(self, &new_chat).await?)
    }

    async fn chats_for_account(&self, account_id: i64) -> StoreResult<Vec<Chat>> {
        Ok(ChatRepository::chats_for_account(self, account_id).await?)
    }

    async fn find_chat(&self, chat_id: i64) -> StoreResult<Option<Chat>> {
        Ok(ChatRepository::find_chat(self, chat_id).await?)
    }

    async fn delete_chat(&self, chat_id: i64) -> StoreResult<bool> {
        Ok(ChatRepository::delete_chat(self, chat_id).await?)
    }

    async fn members(&self, chat_id: i64) -> StoreResult<Vec<ChatMember>> {
        Ok(ChatRepository::members(self, chat_id).await?)
    }
}

impl AuthProvider for Authenticator {
    async fn verify_token(&self, token: &str) -> Result<Account, AuthError> {
        let (account, _session) = self.authenticate_token(token).await?;
        Ok(account)
    }
}
