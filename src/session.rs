//! Per-process client session state.

use crate::chat::{IdentityRegistrar, RoomMembership, RoomMessageLog};

/// State of the relay channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No channel, either never opened or closed.
    #[default]
    Disconnected,
    /// Channel requested; waiting for the relay to assign an identity.
    Connecting,
    /// Identity assigned.
    Connected,
}

impl ConnectionState {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything this client knows about itself.
///
/// Owned by [`crate::ChatClient`]; other code reads it through the accessors.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) local_identity: String,
    pub(crate) state: ConnectionState,
    pub(crate) membership: RoomMembership,
    pub(crate) registrar: IdentityRegistrar,
    pub(crate) log: RoomMessageLog,
}

impl Session {
    /// Create a disconnected session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity assigned by the relay; empty until connected.
    pub fn local_identity(&self) -> &str {
        &self.local_identity
    }

    /// Current channel state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Room this client believes it has joined.
    pub fn current_room(&self) -> Option<&str> {
        self.membership.current()
    }

    /// Received room messages.
    pub fn log(&self) -> &RoomMessageLog {
        &self.log
    }

    /// Whether the identity was announced to the relay.
    pub fn is_registered(&self) -> bool {
        self.registrar.is_registered()
    }
}
