//! Per-connection session state: handshake flags and resource subscriptions.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::types::{InitializeParams, McpError, McpResult};

/// Where a session stands in the initialize handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeState {
    Uninitialized,
    Handshaking,
    Ready,
}

/// Server-side state for one client connection.
///
/// Both handshake flags only ever go from false to true. `client_info` is
/// published before `receive_init_request`, so anyone who observes the flag
/// also observes the client info.
#[derive(Debug)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    client_info: OnceLock<InitializeParams>,
    receive_init_request: AtomicBool,
    ready: AtomicBool,
    subscribed_resources: RwLock<HashSet<String>>,
}

/// Point-in-time copy of a session, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub state: HandshakeState,
    pub client: Option<String>,
    pub subscriptions: Vec<String>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            client_info: OnceLock::new(),
            receive_init_request: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            subscribed_resources: RwLock::new(HashSet::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client_info(&self) -> Option<&InitializeParams> {
        self.client_info.get()
    }

    pub fn received_init_request(&self) -> bool {
        self.receive_init_request.load(Ordering::Acquire)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn state(&self) -> HandshakeState {
        // `ready` first: it is only ever set after `receive_init_request`.
        if self.is_ready() {
            HandshakeState::Ready
        } else if self.received_init_request() {
            HandshakeState::Handshaking
        } else {
            HandshakeState::Uninitialized
        }
    }

    /// Uninitialized -> Handshaking. Client info is write-once; a second
    /// initialize is rejected and leaves the session untouched.
    pub(crate) fn record_initialize(&self, params: InitializeParams) -> McpResult<()> {
        self.client_info
            .set(params)
            .map_err(|_| McpError::AlreadyInitialized(self.id.clone()))?;
        self.receive_init_request.store(true, Ordering::Release);
        Ok(())
    }

    /// Handshaking -> Ready. Repeating it once ready is a no-op.
    pub(crate) fn mark_ready(&self) -> McpResult<()> {
        if !self.received_init_request() {
            return Err(McpError::HandshakeOutOfOrder(self.id.clone()));
        }
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    /// Record interest in change notifications for `uri`. Idempotent.
    pub async fn subscribe(&self, uri: &str) {
        let mut subscriptions = self.subscribed_resources.write().await;
        if !subscriptions.contains(uri) {
            subscriptions.insert(uri.to_string());
        }
    }

    /// Drop interest in `uri`. Removing an absent uri is not an error.
    pub async fn unsubscribe(&self, uri: &str) {
        self.subscribed_resources.write().await.remove(uri);
    }

    pub async fn is_subscribed(&self, uri: &str) -> bool {
        self.subscribed_resources.read().await.contains(uri)
    }

    pub async fn subscriptions(&self) -> Vec<String> {
        let mut uris: Vec<String> = self.subscribed_resources.read().await.iter().cloned().collect();
        uris.sort();
        uris
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            created_at: self.created_at,
            state: self.state(),
            client: self
                .client_info()
                .map(|info| format!("{} v{}", info.client_info.name, info.client_info.version)),
            subscriptions: self.subscriptions().await,
        }
    }
}
