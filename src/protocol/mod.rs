//! Wire protocol spoken with the relay.

pub mod messages;

pub use messages::{InboundEvent, OutboundRequest};
