//! Session tracking: handshake state and resource subscriptions per connection.

pub mod state;
pub mod store;

pub use state::{HandshakeState, Session, SessionSnapshot};
pub use store::SessionStore;
