//! Huddle Database Crate
//!
//! SQLite pool setup, embedded migrations, and the chat aggregate repository.

use huddle_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use entities::{Chat, ChatMember, MemberRole, NewChat};
pub use migrations::{run_migrations, MIGRATOR};
pub use repos::ChatRepository;
pub use types::{DatabaseError, DatabaseResult};

/// Connect and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
