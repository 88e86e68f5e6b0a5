use std::collections::HashMap;

use aqar_core::location::MapLocation;
use aqar_core::types::Timestamp;
use chrono::{Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Per-visitor map state.
///
/// Created on first view, updated on each map click, read when the
/// estimation form is submitted.
#[derive(Debug, Clone, Serialize)]
pub struct MapSession {
    pub id: String,
    pub location: MapLocation,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MapSession {
    fn is_expired(&self, now: Timestamp, ttl: Duration) -> bool {
        now - self.updated_at > ttl
    }
}

/// Holds every live map session.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. A session idle for longer than the TTL is
/// dropped the next time the store is touched.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, MapSession>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a new, empty store whose sessions expire after `ttl` idle.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Start a session centred on the default map location.
    ///
    /// Expired sessions are pruned first.
    pub async fn create(&self) -> MapSession {
        let now = Utc::now();
        let session = MapSession {
            id: uuid::Uuid::new_v4().to_string(),
            location: MapLocation::default(),
            created_at: now,
            updated_at: now,
        };
        let mut sessions = self.sessions.write().await;
        self.prune_locked(&mut sessions, now);
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Look up a live session. An expired one is removed and reported absent.
    pub async fn get(&self, id: &str) -> Option<MapSession> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            let session = sessions.get(id)?;
            if !session.is_expired(now, self.ttl) {
                return Some(session.clone());
            }
        }
        self.sessions.write().await.remove(id);
        None
    }

    /// Record a map click. Returns `None` for an unknown or expired session.
    ///
    /// The caller validates `location` first.
    pub async fn set_location(&self, id: &str, location: MapLocation) -> Option<MapSession> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        if sessions.get(id)?.is_expired(now, self.ttl) {
            sessions.remove(id);
            return None;
        }
        let session = sessions.get_mut(id)?;
        session.location = location;
        session.updated_at = now;
        Some(session.clone())
    }

    /// Drop every session idle for longer than the TTL as of `now`.
    /// Returns how many were removed.
    pub async fn prune_expired(&self, now: Timestamp) -> usize {
        let mut sessions = self.sessions.write().await;
        self.prune_locked(&mut sessions, now)
    }

    fn prune_locked(&self, sessions: &mut HashMap<String, MapSession>, now: Timestamp) -> usize {
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.ttl));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = sessions.len(), "Pruned expired map sessions");
        }
        removed
    }

    /// Remove a session by its ID.
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
