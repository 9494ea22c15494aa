use huddle_auth::Account;
use huddle_chats::{Chat, ChatMember, CreateChatRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub id: i64,
    pub name: String,
    pub admin_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            name: chat.name,
            admin_id: chat.admin_id,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatMemberResponse {
    pub account_id: i64,
    /// `admin` or `member`
    pub role: String,
    pub joined_at: String,
}

impl From<ChatMember> for ChatMemberResponse {
    fn from(member: ChatMember) -> Self {
        Self {
            account_id: member.account_id,
            role: member.role.to_string(),
            joined_at: member.joined_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChatBody {
    #[serde(default)]
    pub name: Option<String>,
    /// JSON array of account ids, encoded as a string: `"[2, 3]"`.
    #[serde(default, rename = "membersList")]
    #[schema(value_type = Option<String>, example = "[2, 3]")]
    pub members_list: Option<Value>,
}

impl From<CreateChatBody> for CreateChatRequest {
    fn from(body: CreateChatBody) -> Self {
        // a bare array is taken as its own encoding; anything else is left
        // for validation to reject
        let members_list = body.members_list.and_then(|value| match value {
            Value::Null => None,
            Value::String(raw) => Some(raw),
            other => Some(other.to_string()),
        });

        CreateChatRequest {
            name: body.name,
            members_list,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateChatResponse {
    pub chat_id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatsResponse {
    pub chats: Vec<ChatResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MembersResponse {
    pub members: Vec<ChatMemberResponse>,
}

/// Serializes to `{}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmptyResponse {}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteChatQuery {
    /// Id of the chat to delete.
    pub chat_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DevTokenRequest {
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: i64,
    pub public_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            public_id: account.public_id,
            display_name: account.display_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: String,
    pub account: AccountResponse,
}
