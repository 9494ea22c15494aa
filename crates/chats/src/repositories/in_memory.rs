//! In-memory port implementations.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use huddle_auth::{Account, AuthError};
use huddle_database::{Chat, ChatMember, NewChat};
use tokio::sync::RwLock;

use crate::ports::{AuthProvider, ChatStore};
use crate::types::{StoreError, StoreResult};

#[derive(Default)]
struct State {
    next_chat_id: i64,
    next_member_id: i64,
    chats: BTreeMap<i64, Chat>,
    members: BTreeMap<i64, Vec<ChatMember>>,
}

/// Chat store held entirely in memory behind one lock.
///
/// Cloning shares the underlying state. When built with
/// [`InMemoryChatStore::with_accounts`] it rejects rosters that name unknown
/// accounts the way a foreign key would.
#[derive(Clone, Default)]
pub struct InMemoryChatStore {
    state: Arc<RwLock<State>>,
    known_accounts: Option<Arc<HashSet<i64>>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = i64>) -> Self {
        Self {
            state: Arc::default(),
            known_accounts: Some(Arc::new(accounts.into_iter().collect())),
        }
    }

    fn is_known(&self, account_id: i64) -> bool {
        self.known_accounts
            .as_ref()
            .map_or(true, |accounts| accounts.contains(&account_id))
    }

    pub async fn chat_count(&self) -> usize {
        self.state.read().await.chats.len()
    }

    pub async fn member_count(&self) -> usize {
        self.state.read().await.members.values().map(Vec::len).sum()
    }
}

impl ChatStore for InMemoryChatStore {
    async fn create_chat_with_members(&self, new_chat: NewChat) -> StoreResult<Chat> {
        if !self.is_known(new_chat.admin_id) {
            return Err(StoreError::ChatInsert(format!(
                "unknown admin account {}",
                new_chat.admin_id
            )));
        }

        if let Some(unknown) = new_chat
            .member_ids
            .iter()
            .find(|id| !self.is_known(**id))
        {
            return Err(StoreError::MemberInsert(format!("unknown account {unknown}")));
        }

        let now = Utc::now().to_rfc3339();
        let mut state = self.state.write().await;

        state.next_chat_id += 1;
        let chat = Chat {
            id: state.next_chat_id,
            name: new_chat.name.clone(),
            admin_id: new_chat.admin_id,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let mut roster = Vec::new();
        for (account_id, role) in new_chat.roster() {
            state.next_member_id += 1;
            roster.push(ChatMember {
                id: state.next_member_id,
                chat_id: chat.id,
                account_id,
                role,
                joined_at: now.clone(),
            });
        }

        state.chats.insert(chat.id, chat.clone());
        state.members.insert(chat.id, roster);

        Ok(chat)
    }

    async fn chats_for_account(&self, account_id: i64) -> StoreResult<Vec<Chat>> {
        let state = self.state.read().await;
        Ok(state
            .chats
            .values()
            .filter(|chat| {
                state
                    .members
                    .get(&chat.id)
                    .is_some_and(|roster| roster.iter().any(|m| m.account_id == account_id))
            })
            .cloned()
            .collect())
    }

    async fn find_chat(&self, chat_id: i64) -> StoreResult<Option<Chat>> {
        Ok(self.state.read().await.chats.get(&chat_id).cloned())
    }

    async fn delete_chat(&self, chat_id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let removed = state.chats.remove(&chat_id).is_some();
        state.members.remove(&chat_id);
        Ok(removed)
    }

    async fn members(&self, chat_id: i64) -> StoreResult<Vec<ChatMember>> {
        Ok(self
            .state
            .read()
            .await
            .members
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Fixed token table, for tests and local tooling.
#[derive(Clone, Default)]
pub struct InMemoryAuthProvider {
    tokens: HashMap<String, Account>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, token: impl Into<String>, account_id: i64) -> Self {
        let account = Account {
            id: account_id,
            public_id: format!("account-{account_id}"),
            display_name: None,
        };
        self.tokens.insert(token.into(), account);
        self
    }
}

impl AuthProvider for InMemoryAuthProvider {
    async fn verify_token(&self, token: &str) -> Result<Account, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidSession);
        }
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::SessionNotFound)
    }
}
