//! Room membership as this client believes it to be.
//!
//! Membership is advisory, not authoritative: a join is recorded as soon as
//! the request is emitted and the relay never confirms it. The relay's own
//! view may differ.

use tracing::{debug, info};

use crate::connection::Emit;
use crate::protocol::OutboundRequest;

/// The room (if any) this client has joined.
///
/// At most one room at a time. A new join supersedes the previous one
/// locally; nothing ever clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomMembership {
    current: Option<String>,
}

impl RoomMembership {
    /// Create a membership with no room.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently joined room.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Join `room_id`.
    ///
    /// An empty id is ignored silently: nothing is emitted, the current room
    /// is unchanged and false is returned. Otherwise `room-join` is emitted
    /// and `room_id` becomes the current room.
    pub fn join<E: Emit + ?Sized>(&mut self, emitter: &mut E, room_id: &str) -> bool {
        if room_id.is_empty() {
            debug!("ignoring join with empty room id");
            return false;
        }

        info!(room_id, previous = ?self.current, "joining room");
        emitter.emit(OutboundRequest::RoomJoin(room_id.to_string()));
        self.current = Some(room_id.to_string());
        true
    }
}
