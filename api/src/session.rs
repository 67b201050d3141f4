//! In-memory login sessions keyed by a random id carried in a cookie

use axum::http::{header, HeaderMap};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::UserAccount;

pub const SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub logged_in: bool,
    pub user_id: i64,
    pub username: String,
}

impl Session {
    pub fn for_user(user: &UserAccount) -> Self {
        Self {
            logged_in: true,
            user_id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Sessions live for the lifetime of the process; there is no expiry.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, session: Session) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, session);
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &Uuid) -> Option<Session> {
        self.sessions.write().await.remove(id)
    }

    /// The logged-in session referenced by the request's cookie, if any.
    pub async fn current(&self, headers: &HeaderMap) -> Option<Session> {
        let id = session_id(headers)?;
        self.get(&id).await.filter(|s| s.logged_in)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Extract the session id from the `Cookie` header(s).
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
