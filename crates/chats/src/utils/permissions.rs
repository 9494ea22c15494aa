//! Permission checking utilities.

use huddle_database::{Chat, ChatMember};

use crate::types::{ChatError, ChatResult};

pub struct PermissionChecker;

impl PermissionChecker {
    /// Only the admin recorded on the chat may delete it.
    pub fn can_delete_chat(chat: &Chat, account_id: i64) -> ChatResult<()> {
        if chat.admin_id != account_id {
            return Err(ChatError::forbidden("only the chat admin can delete this chat"));
        }
        Ok(())
    }

    pub fn can_view_members(members: &[ChatMember], account_id: i64) -> ChatResult<()> {
        if !members.iter().any(|member| member.account_id == account_id) {
            return Err(ChatError::forbidden("not a member of this chat"));
        }
        Ok(())
    }
}
