use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use cuid2::CuidConstructor;
use huddle_config::AuthConfig;
use once_cell::sync::Lazy;
use rand::RngCore;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};

static CUID: Lazy<CuidConstructor> = Lazy::new(CuidConstructor::new);

// Keeps expiry timestamps inside the four-digit years RFC 3339 can round-trip.
const MAX_SESSION_TTL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

#[derive(Clone)]
pub struct Authenticator {
    pool: SqlitePool,
    session_ttl: Duration,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("account not found")]
    AccountNotFound,
    #[error("session not found")]
    SessionNotFound,
    #[error("session expired")]
    SessionExpired,
    #[error("invalid session token")]
    InvalidSession,
}

impl AuthError {
    /// True for failures of the backing store rather than of the credential.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Database(_))
    }
}

/// Identity of an authenticated caller.
///
/// `id` is the numeric key chats refer to; `public_id` is the opaque handle
/// handed out to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i64,
    pub public_id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub account_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: AuthConfig) -> Self {
        let ttl_seconds = i64::try_from(config.session_ttl_seconds)
            .unwrap_or(i64::MAX)
            .min(MAX_SESSION_TTL_SECONDS);
        let session_ttl = Duration::seconds(ttl_seconds);

        Self { pool, session_ttl }
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub async fn register_account(
        &self,
        display_name: Option<String>,
    ) -> Result<Account, AuthError> {
        let now = Utc::now().to_rfc3339();
        let public_id = new_public_id();

        let id = sqlx::query(
            "INSERT INTO accounts (public_id, display_name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(display_name.as_deref())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(account = %public_id, id, "registered account");

        Ok(Account {
            id,
            public_id,
            display_name,
        })
    }

    pub async fn authenticate_token(
        &self,
        token: &str,
    ) -> Result<(Account, AuthSession), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidSession);
        }

        let row = sqlx::query("SELECT account_id, expires_at FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(AuthError::SessionNotFound);
        };

        let account_id: i64 = row.try_get("account_id")?;
        let expires_at: String = row.try_get("expires_at")?;

        let expires_at = DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|_| AuthError::InvalidSession)?
            .with_timezone(&Utc);

        if expires_at <= Utc::now() {
            sqlx::query("DELETE FROM sessions WHERE token = ?")
                .bind(token)
                .execute(&self.pool)
                .await?;
            debug!(account_id, "removed expired session");
            return Err(AuthError::SessionExpired);
        }

        let account = self.account(account_id).await?;
        let session = AuthSession {
            token: token.to_owned(),
            account_id,
            expires_at,
        };

        Ok((account, session))
    }

    pub async fn account(&self, id: i64) -> Result<Account, AuthError> {
        let row = sqlx::query("SELECT id, public_id, display_name FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(AuthError::AccountNotFound);
        };

        Ok(Account {
            id: row.try_get("id")?,
            public_id: row.try_get("public_id")?,
            display_name: row.try_get("display_name")?,
        })
    }

    pub async fn issue_session(&self, account_id: i64) -> Result<AuthSession, AuthError> {
        let token = generate_session_token();
        let now = Utc::now();
        let expires_at = now + self.session_ttl;

        sqlx::query(
            "INSERT INTO sessions (account_id, token, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(account_id)
        .bind(&token)
        .bind(now.to_rfc3339())
        .bind(expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(AuthSession {
            token,
            account_id,
            expires_at,
        })
    }
}

fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn new_public_id() -> String {
    CUID.create_id()
}
