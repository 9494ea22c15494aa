use std::sync::Arc;

use huddle_auth::{Account, Authenticator};
use huddle_chats::ChatService;
use huddle_config::AuthConfig;
use huddle_database::ChatRepository;
use sqlx::SqlitePool;

use crate::ApiError;

pub type SqliteChatService = ChatService<ChatRepository, Authenticator>;

#[derive(Clone)]
pub struct AppState {
    chats: Arc<SqliteChatService>,
    authenticator: Authenticator,
    allow_dev_tokens: bool,
}

impl AppState {
    pub fn new(pool: SqlitePool, auth: AuthConfig) -> Self {
        let allow_dev_tokens = auth.allow_dev_tokens;
        let authenticator = Authenticator::new(pool.clone(), auth);
        let chats = ChatService::new(ChatRepository::new(pool), authenticator.clone());

        Self {
            chats: Arc::new(chats),
            authenticator,
            allow_dev_tokens,
        }
    }

    pub fn chats(&self) -> &SqliteChatService {
        &self.chats
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn dev_tokens_enabled(&self) -> bool {
        self.allow_dev_tokens
    }

    pub async fn authenticate(&self, token: &str) -> Result<Account, ApiError> {
        self.chats.authenticate(token).await.map_err(ApiError::from)
    }
}
