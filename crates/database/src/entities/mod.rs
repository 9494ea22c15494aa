//! Row types for the chat aggregate

pub mod chat;
pub mod member;

pub use chat::{Chat, NewChat};
pub use member::{ChatMember, MemberRole};
