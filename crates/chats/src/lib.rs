//! # Huddle Chats Crate
//!
//! Business rules for chat groups: creating a chat with its roster, listing
//! the chats an account belongs to, and deleting a chat as its admin.
//!
//! ## Architecture
//!
//! - **Ports**: `ChatStore` and `AuthProvider`, injected into the service
//! - **Services**: `ChatService`, the only place the rules live
//! - **Repositories**: port implementations over SQLite and in memory
//! - **Types**: requests, responses, and the error taxonomy
//! - **Utils**: input validation and permission checks
//!
//! ## Usage
//!
//! ```rust,no_run
//! use huddle_chats::{ChatService, CreateChatRequest, InMemoryAuthProvider, InMemoryChatStore};
//!
//! # async fn demo() -> huddle_chats::ChatResult<()> {
//! let auth = InMemoryAuthProvider::new().with_account("token-1", 1);
//! let service = ChatService::new(InMemoryChatStore::new(), auth);
//!
//! let account = service.authenticate("token-1").await?;
//! let created = service
//!     .create_chat(&account, CreateChatRequest::new("Team", "[2, 3]"))
//!     .await?;
//! assert_eq!(created.name, "Team");
//! # Ok(())
//! # }
//! ```

pub mod ports;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;

pub use huddle_auth::{Account, AuthError};
pub use huddle_database::{Chat, ChatMember, MemberRole, NewChat};

pub use ports::{AuthProvider, ChatStore};
pub use repositories::{InMemoryAuthProvider, InMemoryChatStore};
pub use services::ChatService;
pub use types::{
    ChatError, ChatListResponse, ChatResult, CreateChatRequest, CreateChatResponse,
    DeleteChatResponse, MemberListResponse, StoreError, StoreResult,
};
