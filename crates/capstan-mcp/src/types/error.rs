//! Error types and JSON-RPC error codes for the MCP server.

use super::capabilities::CapabilityKind;
use super::message::{JsonRpcError, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP-specific error codes.
pub mod mcp_error_codes {
    pub const RESOURCE_NOT_FOUND: i32 = -32802;
    pub const TOOL_NOT_FOUND: i32 = -32803;
    pub const PROMPT_NOT_FOUND: i32 = -32804;
    pub const COMPLETION_NOT_FOUND: i32 = -32805;

    /// Server: no session is registered under the caller's id.
    pub const SESSION_NOT_FOUND: i32 = -32851;
    /// Server: `initialized` arrived before `initialize`.
    pub const HANDSHAKE_OUT_OF_ORDER: i32 = -32853;
    /// Server: strict readiness policy rejected a pre-handshake request.
    pub const SESSION_NOT_READY: i32 = -32854;
}

/// All errors that can occur in the MCP server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// The raw parameter payload did not decode into the method's request type.
    #[error("Malformed params for {method}: {reason}")]
    MalformedParams { method: String, reason: String },

    /// Raised by capability handlers for semantically invalid arguments.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Session not found: {0:?}")]
    SessionMissing(String),

    #[error("Session {0:?} has not received the client's initialize request")]
    HandshakeOutOfOrder(String),

    #[error("Session {0:?} is already initialized")]
    AlreadyInitialized(String),

    #[error("Session {0:?} has not completed the initialize handshake")]
    SessionNotReady(String),

    #[error("Missing {kind} handler: {key}")]
    HandlerNotFound { kind: CapabilityKind, key: String },

    #[error("Invalid completion reference")]
    InvalidCompletionReference,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) | McpError::AlreadyInitialized(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::MalformedParams { .. }
            | McpError::InvalidParams(_)
            | McpError::InvalidCompletionReference => INVALID_PARAMS,
            McpError::InternalError(_) => INTERNAL_ERROR,
            McpError::SessionMissing(_) => SESSION_NOT_FOUND,
            McpError::HandshakeOutOfOrder(_) => HANDSHAKE_OUT_OF_ORDER,
            McpError::SessionNotReady(_) => SESSION_NOT_READY,
            McpError::HandlerNotFound { kind, .. } => match kind {
                CapabilityKind::Prompt => PROMPT_NOT_FOUND,
                CapabilityKind::Resource => RESOURCE_NOT_FOUND,
                CapabilityKind::Tool => TOOL_NOT_FOUND,
                CapabilityKind::Completion => COMPLETION_NOT_FOUND,
            },
            McpError::Io(_) => INTERNAL_ERROR,
            McpError::Json(_) => PARSE_ERROR,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError::new(id, self.code(), self.to_string())
    }
}

pub type McpResult<T> = Result<T, McpError>;
