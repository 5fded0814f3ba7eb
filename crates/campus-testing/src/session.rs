//! In-memory session store and session fixtures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue};
use uuid::Uuid;

use campus_domain::user::UserRole;
use campus_session::cookie::SESSION_COOKIE;
use campus_session::session::{SessionData, SessionError, SessionStore, generate_session_id};

/// `SessionStore` backed by a shared map. Clones share state.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionData>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a session under a known id.
    pub fn insert(&self, session_id: &str, data: SessionData) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.to_owned(), data);
    }

    pub fn get(&self, session_id: &str) -> Option<SessionData> {
        self.sessions.lock().unwrap().get(session_id).cloned()
    }
}

impl SessionStore for MemorySessionStore {
    async fn create(&self, data: &SessionData) -> Result<String, SessionError> {
        let session_id = generate_session_id();
        self.insert(&session_id, data.clone());
        Ok(session_id)
    }

    async fn load(&self, session_id: &str) -> Result<Option<SessionData>, SessionError> {
        Ok(self.get(session_id))
    }

    async fn destroy(&self, session_id: &str) -> Result<(), SessionError> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }
}

/// Session for a fresh user with the given role.
pub fn sample_session(role: UserRole) -> SessionData {
    let user_id = Uuid::new_v4();
    let username = format!("{}-{}", role.as_str(), &user_id.simple().to_string()[..6]);
    SessionData {
        user_id,
        email: format!("{username}@lnmiit.ac.in"),
        username: Some(username),
        role,
    }
}

/// `Cookie` header carrying `session_id`.
pub fn session_cookie_header(session_id: &str) -> (HeaderName, HeaderValue) {
    (
        axum::http::header::COOKIE,
        HeaderValue::from_str(&format!("{SESSION_COOKIE}={session_id}")).unwrap(),
    )
}
