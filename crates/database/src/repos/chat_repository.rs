//! Repository for the chat aggregate: a chat row plus its membership rows.

use crate::entities::{Chat, ChatMember, NewChat};
use crate::types::{DatabaseError, DatabaseResult};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

const CHAT_COLUMNS: &str = "c.id, c.name, c.admin_id, c.created_at, c.updated_at";

/// Rows per member INSERT. Four binds per row keeps each statement well under
/// SQLite's bound-parameter limit.
const MEMBER_INSERT_BATCH: usize = 500;

#[derive(Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Write the chat, the admin membership, and every member row in a single
    /// transaction. Any failure rolls the whole aggregate back.
    pub async fn create_chat_with_members(&self, new_chat: &NewChat) -> DatabaseResult<Chat> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await.map_err(DatabaseError::query)?;

        let chat_id = sqlx::query(
            "INSERT INTO chats (name, admin_id, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&new_chat.name)
        .bind(new_chat.admin_id)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::ChatInsertFailed(e.to_string()))?
        .last_insert_rowid();

        let roster: Vec<_> = new_chat.roster().collect();
        for chunk in roster.chunks(MEMBER_INSERT_BATCH) {
            let mut insert_members = QueryBuilder::<Sqlite>::new(
                "INSERT INTO chat_members (chat_id, account_id, role, joined_at) ",
            );
            insert_members.push_values(chunk, |mut row, (account_id, role)| {
                row.push_bind(chat_id)
                    .push_bind(*account_id)
                    .push_bind(role.as_str())
                    .push_bind(now.clone());
            });

            insert_members
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::MemberInsertFailed(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::ChatInsertFailed(e.to_string()))?;

        info!(
            chat_id,
            admin_id = new_chat.admin_id,
            member_count = roster.len(),
            "created new chat"
        );

        Ok(Chat {
            id: chat_id,
            name: new_chat.name.clone(),
            admin_id: new_chat.admin_id,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Chats the account holds a membership in, oldest first.
    pub async fn chats_for_account(&self, account_id: i64) -> DatabaseResult<Vec<Chat>> {
        let sql = format!(
            "SELECT {CHAT_COLUMNS}
             FROM chats c
             JOIN chat_members cm ON cm.chat_id = c.id
             WHERE cm.account_id = ?
             ORDER BY c.id ASC"
        );

        sqlx::query_as::<_, Chat>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::query)
    }

    pub async fn find_chat(&self, chat_id: i64) -> DatabaseResult<Option<Chat>> {
        let sql = format!("SELECT {CHAT_COLUMNS} FROM chats c WHERE c.id = ?");

        sqlx::query_as::<_, Chat>(&sql)
            .bind(chat_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::query)
    }

    /// Delete the chat; memberships go with it through the foreign key cascade.
    ///
    /// Returns `false` when no row matched, which is how a lost race against a
    /// concurrent delete shows up.
    pub async fn delete_chat(&self, chat_id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(chat_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::query)?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(chat_id, "deleted chat");
        } else {
            debug!(chat_id, "delete matched no chat");
        }
        Ok(deleted)
    }

    /// Roster of a chat, admin first, then in join order.
    pub async fn members(&self, chat_id: i64) -> DatabaseResult<Vec<ChatMember>> {
        sqlx::query_as::<_, ChatMember>(
            "SELECT id, chat_id, account_id, role, joined_at
             FROM chat_members
             WHERE chat_id = ?
             ORDER BY CASE role WHEN 'admin' THEN 0 ELSE 1 END, id ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }
}
