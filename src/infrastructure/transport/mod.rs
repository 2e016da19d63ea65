pub mod outbox_transport;
pub mod transport;

pub use outbox_transport::{InboxEntry, OutboxTransport};
pub use transport::{Transport, TransportError};
