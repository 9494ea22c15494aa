//! Business logic layer for the chat system.

pub mod chat_service;

pub use chat_service::ChatService;
