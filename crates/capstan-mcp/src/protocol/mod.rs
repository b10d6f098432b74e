//! MCP protocol handling: method routing, handshake, and readiness policy.

pub mod handler;
pub mod method;
pub mod negotiation;
pub mod params;
pub mod policy;
pub mod validator;

pub use handler::ProtocolHandler;
pub use method::{Method, NotificationMethod};
pub use policy::ReadinessPolicy;
