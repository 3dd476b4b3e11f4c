//! relaychat - terminal chat client for a room and private-message relay.
//!
//! The client keeps one WebSocket to the relay, announces the identity the
//! relay assigns it, and sends each message either privately to one peer or
//! to the joined room. Received room messages are kept in an append-only log.

pub mod chat;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod session;

pub use chat::{Destination, OutboundDraft, RoomMessageEntry, RoomMessageLog};
pub use client::{dispatch, ChatClient, Notification};
pub use config::Config;
pub use connection::{ChannelEvent, ConnectionManager, Emit};
pub use error::{ChatError, Result, ValidationError};
pub use protocol::{InboundEvent, OutboundRequest};
pub use session::{ConnectionState, Session};
