//! Main request dispatcher: routes method-named requests from a session to
//! session state or to a capability registry.

use std::sync::Arc;

use serde_json::Value;

use crate::server::McpServer;
use crate::session::{Session, SessionStore};
use crate::types::*;

use super::method::{Method, NotificationMethod};
use super::negotiation;
use super::params::decode;
use super::validator::{validate_notification, validate_request};

/// The dispatcher the transport calls once per inbound message.
///
/// Every request goes through the same steps: decode params, resolve the
/// session, apply the readiness policy, then act. Handler results and errors
/// are returned unchanged.
#[derive(Debug, Clone)]
pub struct ProtocolHandler {
    server: Arc<McpServer>,
    sessions: SessionStore,
}

impl ProtocolHandler {
    pub fn new(server: Arc<McpServer>, sessions: SessionStore) -> Self {
        Self { server, sessions }
    }

    pub fn server(&self) -> &Arc<McpServer> {
        &self.server
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    // ───────────────────── JSON-RPC surface ─────────────────────

    /// Handle one decoded JSON-RPC message from `session_id`. Returns the
    /// response to send, or `None` for notifications.
    pub async fn handle_message(&self, session_id: &str, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_json_request(session_id, req).await),
            JsonRpcMessage::Notification(notif) => {
                self.handle_json_notification(session_id, notif).await;
                None
            }
            _ => {
                tracing::warn!(session = session_id, "Received unexpected message type from client");
                None
            }
        }
    }

    async fn handle_json_request(&self, session_id: &str, request: JsonRpcRequest) -> Value {
        if let Err(e) = validate_request(&request) {
            return serde_json::to_value(e.to_json_rpc_error(request.id)).unwrap_or_default();
        }

        let id = request.id.clone();
        let result = match raw_params(request.params.as_ref()) {
            Ok(raw) => self.handle_request(session_id, &request.method, &raw).await,
            Err(e) => Err(McpError::InternalError(e.to_string())),
        }
        .and_then(|result| {
            serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
        });

        match result {
            Ok(value) => serde_json::to_value(JsonRpcResponse::new(id, value)).unwrap_or_default(),
            Err(e) => {
                tracing::debug!(session = session_id, method = %request.method, "request failed: {e}");
                serde_json::to_value(e.to_json_rpc_error(id)).unwrap_or_default()
            }
        }
    }

    async fn handle_json_notification(&self, session_id: &str, notification: JsonRpcNotification) {
        if let Err(e) = validate_notification(&notification) {
            tracing::warn!(session = session_id, method = %notification.method, "Notification rejected: {e}");
            return;
        }

        let raw = match raw_params(notification.params.as_ref()) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(session = session_id, "Unencodable notification params: {e}");
                return;
            }
        };

        match self
            .handle_notification(session_id, &notification.method, &raw)
            .await
        {
            Ok(()) => {}
            Err(McpError::MethodNotFound(method)) => {
                tracing::debug!(session = session_id, "Unknown notification: {method}");
            }
            Err(e) => {
                tracing::warn!(session = session_id, method = %notification.method, "Notification rejected: {e}");
            }
        }
    }

    // ───────────────────── raw dispatch ─────────────────────

    /// Dispatch a request given its method name and raw params payload.
    pub async fn handle_request(
        &self,
        session_id: &str,
        method: &str,
        raw: &[u8],
    ) -> McpResult<ServerResult> {
        let method: Method = method.parse()?;
        tracing::debug!(session = session_id, %method, "dispatching request");
        let name = method.name();

        match method {
            Method::Initialize => self
                .initialize(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::Initialize),
            Method::Ping => {
                let _: PingParams = decode(name, raw)?;
                Ok(ServerResult::Empty(self.ping()))
            }
            Method::ListPrompts => self
                .list_prompts(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::PromptList),
            Method::GetPrompt => self
                .get_prompt(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::PromptGet),
            Method::ListResources => self
                .list_resources(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::ResourceList),
            Method::ReadResource => self
                .read_resource(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::ResourceRead),
            Method::ListResourceTemplates => self
                .list_resource_templates(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::ResourceTemplateList),
            Method::Subscribe => self
                .subscribe(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::Empty),
            Method::Unsubscribe => self
                .unsubscribe(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::Empty),
            Method::ListTools => self
                .list_tools(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::ToolList),
            Method::CallTool => self
                .call_tool(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::ToolCall),
            Method::Complete => self
                .complete(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::Complete),
            Method::SetLogLevel => self
                .set_log_level(session_id, decode(name, raw)?)
                .await
                .map(ServerResult::Empty),
        }
    }

    /// Dispatch a one-way notification given its method name and raw params.
    pub async fn handle_notification(
        &self,
        session_id: &str,
        method: &str,
        raw: &[u8],
    ) -> McpResult<()> {
        let method: NotificationMethod = method.parse()?;
        let name = method.name();

        match method {
            NotificationMethod::Initialized => {
                self.initialized(session_id, decode(name, raw)?).await
            }
            NotificationMethod::Cancelled => {
                let params: CancelledParams = decode(name, raw)?;
                self.sessions.get(session_id).await?;
                tracing::info!(
                    session = session_id,
                    request = %params.request_id,
                    reason = params.reason.as_deref().unwrap_or(""),
                    "Received cancellation notification"
                );
                Ok(())
            }
        }
    }

    // ───────────────────── typed operations ─────────────────────

    async fn admit(&self, session_id: &str, method: Method) -> McpResult<Arc<Session>> {
        let session = self.sessions.get(session_id).await?;
        self.server.config().readiness.admit(&session, method)?;
        Ok(session)
    }

    pub async fn initialize(
        &self,
        session_id: &str,
        params: InitializeParams,
    ) -> McpResult<InitializeResult> {
        let session = self.admit(session_id, Method::Initialize).await?;
        negotiation::initialize(&session, params, self.server.config())
    }

    pub async fn initialized(&self, session_id: &str, _params: InitializedParams) -> McpResult<()> {
        let session = self.sessions.get(session_id).await?;
        negotiation::initialized(&session)
    }

    pub fn ping(&self) -> EmptyResult {
        EmptyResult::default()
    }

    pub async fn list_prompts(
        &self,
        session_id: &str,
        _params: ListParams,
    ) -> McpResult<PromptListResult> {
        self.admit(session_id, Method::ListPrompts).await?;
        Ok(PromptListResult {
            prompts: self.server.prompts().list_prompts(),
            next_cursor: None,
        })
    }

    pub async fn get_prompt(
        &self,
        session_id: &str,
        params: PromptGetParams,
    ) -> McpResult<PromptGetResult> {
        self.admit(session_id, Method::GetPrompt).await?;
        self.server.prompts().get(params).await
    }

    pub async fn list_resources(
        &self,
        session_id: &str,
        _params: ListParams,
    ) -> McpResult<ResourceListResult> {
        self.admit(session_id, Method::ListResources).await?;
        Ok(ResourceListResult {
            resources: self.server.resources().list_resources(),
            next_cursor: None,
        })
    }

    pub async fn read_resource(
        &self,
        session_id: &str,
        params: ResourceReadParams,
    ) -> McpResult<ReadResourceResult> {
        self.admit(session_id, Method::ReadResource).await?;
        self.server.resources().read(params).await
    }

    pub async fn list_resource_templates(
        &self,
        session_id: &str,
        _params: ListParams,
    ) -> McpResult<ResourceTemplateListResult> {
        self.admit(session_id, Method::ListResourceTemplates).await?;
        Ok(ResourceTemplateListResult {
            resource_templates: self.server.resources().list_templates(),
            next_cursor: None,
        })
    }

    pub async fn subscribe(
        &self,
        session_id: &str,
        params: ResourceSubscribeParams,
    ) -> McpResult<EmptyResult> {
        let session = self.admit(session_id, Method::Subscribe).await?;
        session.subscribe(&params.uri).await;
        tracing::debug!(session = session_id, uri = %params.uri, "subscribed");
        Ok(EmptyResult::default())
    }

    pub async fn unsubscribe(
        &self,
        session_id: &str,
        params: ResourceSubscribeParams,
    ) -> McpResult<EmptyResult> {
        let session = self.admit(session_id, Method::Unsubscribe).await?;
        session.unsubscribe(&params.uri).await;
        tracing::debug!(session = session_id, uri = %params.uri, "unsubscribed");
        Ok(EmptyResult::default())
    }

    pub async fn list_tools(
        &self,
        session_id: &str,
        _params: ListParams,
    ) -> McpResult<ToolListResult> {
        self.admit(session_id, Method::ListTools).await?;
        Ok(ToolListResult {
            tools: self.server.tools().list_tools(),
            next_cursor: None,
        })
    }

    pub async fn call_tool(
        &self,
        session_id: &str,
        params: ToolCallParams,
    ) -> McpResult<ToolCallResult> {
        self.admit(session_id, Method::CallTool).await?;
        self.server.tools().call(params).await
    }

    pub async fn complete(
        &self,
        session_id: &str,
        params: CompleteParams,
    ) -> McpResult<CompleteResult> {
        self.admit(session_id, Method::Complete).await?;
        self.server.completions().complete(params).await
    }

    /// Accepted and acknowledged; the server does not forward log messages
    /// to clients, so there is no level to change.
    pub async fn set_log_level(
        &self,
        session_id: &str,
        params: SetLevelParams,
    ) -> McpResult<EmptyResult> {
        self.admit(session_id, Method::SetLogLevel).await?;
        tracing::debug!(session = session_id, level = ?params.level, "logging/setLevel ignored");
        Ok(EmptyResult::default())
    }

    /// Build a `notifications/resources/updated` message for every session
    /// subscribed to `uri`, as (session id, notification) pairs. Delivery is
    /// left to the transport.
    pub async fn resource_updated(&self, uri: &str) -> Vec<(String, JsonRpcNotification)> {
        self.sessions
            .subscribers(uri)
            .await
            .into_iter()
            .map(|id| {
                let notification = ResourceUpdatedParams {
                    uri: uri.to_string(),
                }
                .into_notification();
                (id, notification)
            })
            .collect()
    }
}
