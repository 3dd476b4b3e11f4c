//! Identity registration with the relay.

use tracing::{info, warn};

use crate::connection::Emit;
use crate::protocol::OutboundRequest;

/// Announces the relay-assigned identity back to the relay, once per channel.
///
/// This is a self-announcement, not a negotiation: no acknowledgement is
/// awaited and the relay is trusted to accept whatever it was told.
#[derive(Debug, Default)]
pub struct IdentityRegistrar {
    registered: bool,
}

impl IdentityRegistrar {
    /// Create a registrar that has not registered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `set-user-id` has been emitted on this channel.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Handle the channel's `connect` event.
    ///
    /// Emits `set-user-id` with `identity` the first time and returns true.
    /// Later calls emit nothing and return false.
    pub fn on_connected<E: Emit + ?Sized>(&mut self, emitter: &mut E, identity: &str) -> bool {
        if self.registered {
            warn!(identity, "duplicate connect event; identity already registered");
            return false;
        }
        emitter.emit(OutboundRequest::SetUserId(identity.to_string()));
        self.registered = true;
        info!(identity, "registered identity with relay");
        true
    }
}
