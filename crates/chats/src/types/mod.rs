//! Shared types for the chat service.

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{ChatError, ChatResult, StoreError, StoreResult};
pub use requests::CreateChatRequest;
pub use responses::{ChatListResponse, CreateChatResponse, DeleteChatResponse, MemberListResponse};
