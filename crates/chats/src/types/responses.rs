//! Results returned by the chat service.

use huddle_database::{Chat, ChatMember};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateChatResponse {
    pub chat_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatListResponse {
    pub chats: Vec<Chat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberListResponse {
    pub members: Vec<ChatMember>,
}

/// Serializes to `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteChatResponse {}
