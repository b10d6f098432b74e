//! The two-step initialize handshake.

use crate::config::ServerConfig;
use crate::session::Session;
use crate::types::{InitializeParams, InitializeResult, McpResult};

/// Handle `initialize`: remember the client and answer with the server's
/// fixed version, capabilities and identity.
///
/// The requested protocol version is not negotiated; a mismatch is logged
/// and the server's own version is returned.
pub fn initialize(
    session: &Session,
    params: InitializeParams,
    config: &ServerConfig,
) -> McpResult<InitializeResult> {
    if params.protocol_version != config.protocol_version {
        tracing::warn!(
            session = session.id(),
            "Client requested protocol version {}, server supports {}. Proceeding with server version.",
            params.protocol_version,
            config.protocol_version
        );
    }

    let client = params.client_info.clone();
    session.record_initialize(params)?;

    tracing::info!(
        session = session.id(),
        "Initialize from client: {} v{}",
        client.name,
        client.version
    );

    Ok(InitializeResult {
        protocol_version: config.protocol_version.clone(),
        capabilities: config.capabilities.clone(),
        server_info: config.server_info.clone(),
        instructions: config.instructions.clone(),
    })
}

/// Handle `notifications/initialized`.
pub fn initialized(session: &Session) -> McpResult<()> {
    session.mark_ready()?;
    tracing::info!(session = session.id(), "MCP handshake complete");
    Ok(())
}
