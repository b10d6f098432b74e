//! capstan-mcp: session lifecycle and capability dispatch for an MCP server.

pub mod completions;
pub mod config;
pub mod prompts;
pub mod protocol;
pub mod registry;
pub mod resources;
pub mod server;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use protocol::{ProtocolHandler, ReadinessPolicy};
pub use server::{McpServer, McpServerBuilder};
pub use session::{Session, SessionStore};
pub use transport::StdioTransport;
