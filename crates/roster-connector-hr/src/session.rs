//! Bearer token sessions and the registry that holds them.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Identifier assigned to each session at connect time.
pub type SessionId = Uuid;

/// An authenticated HR API session.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    token: SecretString,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session with a fresh id, expiring `expires_in` seconds from now.
    ///
    /// Lifetimes beyond the representable range saturate.
    pub fn new(token: impl Into<String>, expires_in: i64) -> Self {
        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .unwrap_or(if expires_in < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });

        Self {
            id: Uuid::new_v4(),
            token: SecretString::from(token.into()),
            expires_at,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true once the server-declared lifetime has elapsed.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Sessions currently open against the HR API, keyed by session id.
///
/// Created by the caller at run start and passed by reference to whatever
/// connects; a completed run leaves it empty.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: Arc<Session>) {
        self.sessions.write().await.insert(session.id(), session);
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.write().await.remove(id)
    }

    pub async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops every session without contacting the server.
    pub async fn clear(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.clear();
        count
    }
}
