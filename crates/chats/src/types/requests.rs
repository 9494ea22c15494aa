//! Request payloads accepted by the chat service.

use serde::Deserialize;

/// Payload for creating a chat.
///
/// `members_list` keeps the wire format clients already send: a JSON array
/// encoded as a string, e.g. `"[2, 3]"`. Both fields are optional here so
/// that a missing field becomes a validation error instead of a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "membersList")]
    pub members_list: Option<String>,
}

impl CreateChatRequest {
    pub fn new(name: impl Into<String>, members_list: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            members_list: Some(members_list.into()),
        }
    }
}
