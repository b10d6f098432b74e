//! Concurrent session id -> session map, owned by the transport.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::{McpError, McpResult};

use super::state::Session;

/// All live sessions, keyed by session id.
///
/// The map lock is held only for the lookup or insert itself; session fields
/// are mutated through the returned `Arc<Session>`, so work on one session
/// never waits on another.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session under `id`, or return the one already there.
    /// An existing session is never reset.
    pub async fn insert(&self, id: impl Into<String>) -> Arc<Session> {
        let id = id.into();
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.clone())
            .or_insert_with(|| {
                tracing::debug!(session = %id, "session registered");
                Arc::new(Session::new(id.clone()))
            })
            .clone()
    }

    /// Register a session under a fresh random id.
    pub async fn create(&self) -> Arc<Session> {
        self.insert(uuid::Uuid::new_v4().to_string()).await
    }

    pub async fn get(&self, id: &str) -> McpResult<Arc<Session>> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| McpError::SessionMissing(id.to_string()))
    }

    pub async fn remove(&self, id: &str) -> Option<Arc<Session>> {
        let removed = self.sessions.write().await.remove(id);
        if removed.is_some() {
            tracing::debug!(session = %id, "session removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids of every session subscribed to `uri`.
    pub async fn subscribers(&self, uri: &str) -> Vec<String> {
        let sessions: Vec<Arc<Session>> = self.sessions.read().await.values().cloned().collect();
        let mut ids = Vec::new();
        for session in sessions {
            if session.is_subscribed(uri).await {
                ids.push(session.id().to_string());
            }
        }
        ids.sort();
        ids
    }
}
