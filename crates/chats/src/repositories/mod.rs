//! Port implementations: SQLite-backed for production, in-memory for tests
//! and embedding.

pub mod in_memory;
pub mod sqlite;

pub use in_memory::{InMemoryAuthProvider, InMemoryChatStore};
