//! Generic name-keyed handler table shared by the prompt, resource, tool and
//! completion registries.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::types::{CapabilityKind, McpError, McpResult};

pub type HandlerFuture<T> = Pin<Box<dyn Future<Output = McpResult<T>> + Send + 'static>>;

/// An application-supplied capability handler.
pub type BoxedHandler<Req, Res> = Arc<dyn Fn(Req) -> HandlerFuture<Res> + Send + Sync>;

/// Maps a capability key (tool name, prompt name, resource URI, completion
/// reference key) to its handler. Populated at build time, read-only after.
pub struct CapabilityRegistry<Req, Res> {
    kind: CapabilityKind,
    handlers: HashMap<String, BoxedHandler<Req, Res>>,
}

impl<Req, Res> CapabilityRegistry<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    pub fn new(kind: CapabilityKind) -> Self {
        Self {
            kind,
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` under `key`, replacing any previous handler.
    pub fn register<F, Fut>(&mut self, key: impl Into<String>, handler: F)
    where
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<Res>> + Send + 'static,
    {
        let key = key.into();
        let boxed: BoxedHandler<Req, Res> =
            Arc::new(move |req| -> HandlerFuture<Res> { Box::pin(handler(req)) });
        if self.handlers.insert(key.clone(), boxed).is_some() {
            tracing::warn!(kind = %self.kind, %key, "replacing previously registered handler");
        }
    }

    pub fn resolve(&self, key: &str) -> McpResult<&BoxedHandler<Req, Res>> {
        self.handlers
            .get(key)
            .ok_or_else(|| McpError::HandlerNotFound {
                kind: self.kind,
                key: key.to_string(),
            })
    }

    /// Look up `key` and run its handler. Handler errors pass through untouched.
    pub async fn call(&self, key: &str, request: Req) -> McpResult<Res> {
        let handler = self.resolve(key)?;
        handler(request).await
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl<Req, Res> std::fmt::Debug for CapabilityRegistry<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("kind", &self.kind)
            .field("keys", &self.keys())
            .finish()
    }
}
