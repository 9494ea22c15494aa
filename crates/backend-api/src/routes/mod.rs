pub mod auth;
pub mod chats;
pub mod docs;
pub mod health;
pub mod models;
