//! Server-side session records.
#![allow(async_fn_in_trait)]

use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;
use rand::RngExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::user::UserRole;

/// Session lifetime in seconds (24 hours).
pub const SESSION_TTL_SECS: u64 = 86_400;

/// Session id length in characters.
pub const SESSION_ID_LEN: usize = 48;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Identity stored behind a session id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Backend(String),
    #[error("corrupt session payload: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Storage for live sessions keyed by an opaque id.
pub trait SessionStore: Send + Sync {
    /// Persist `data` under a fresh id and return the id.
    async fn create(&self, data: &SessionData) -> Result<String, SessionError>;

    async fn load(&self, session_id: &str) -> Result<Option<SessionData>, SessionError>;

    /// Remove a session. Unknown ids are ignored.
    async fn destroy(&self, session_id: &str) -> Result<(), SessionError>;
}

/// Random alphanumeric session id of [`SESSION_ID_LEN`] characters.
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    (0..SESSION_ID_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

// ── Redis store ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisSessionStore {
    pub pool: Pool,
}

fn session_key(session_id: &str) -> String {
    format!("session:{}", session_id)
}

fn backend(e: impl std::fmt::Display) -> SessionError {
    SessionError::Backend(e.to_string())
}

impl SessionStore for RedisSessionStore {
    async fn create(&self, data: &SessionData) -> Result<String, SessionError> {
        let payload = serde_json::to_string(data)?;
        let session_id = generate_session_id();
        let mut conn = self.pool.get().await.map_err(backend)?;
        let (): () = conn
            .set_ex(session_key(&session_id), payload, SESSION_TTL_SECS)
            .await
            .map_err(backend)?;
        Ok(session_id)
    }

    async fn load(&self, session_id: &str) -> Result<Option<SessionData>, SessionError> {
        let mut conn = self.pool.get().await.map_err(backend)?;
        let payload: Option<String> = conn.get(session_key(session_id)).await.map_err(backend)?;
        match payload {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn destroy(&self, session_id: &str) -> Result<(), SessionError> {
        let mut conn = self.pool.get().await.map_err(backend)?;
        let (): () = conn.del(session_key(session_id)).await.map_err(backend)?;
        Ok(())
    }
}
