//! Routing of outgoing messages.
//!
//! A draft goes to exactly one place. A target user always wins over the
//! joined room; with neither, the draft is rejected before anything is sent.

use tracing::info;

use crate::connection::Emit;
use crate::error::ValidationError;
use crate::protocol::OutboundRequest;

/// The message the user is composing.
///
/// `target_user_id` is sticky: a successful send clears only `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundDraft {
    /// Message text.
    pub text: String,
    /// Receiver for a private message. Empty means none.
    pub target_user_id: String,
}

impl OutboundDraft {
    /// A draft with text and no target.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_user_id: String::new(),
        }
    }

    /// Set the private-message target.
    #[must_use]
    pub fn to(mut self, target_user_id: impl Into<String>) -> Self {
        self.target_user_id = target_user_id.into();
        self
    }

    /// The target, if one is set.
    pub fn target(&self) -> Option<&str> {
        Some(self.target_user_id.as_str()).filter(|t| !t.is_empty())
    }

    /// Clear the text, keeping the target.
    pub fn clear_text(&mut self) {
        self.text.clear();
    }
}

/// Where a routed message went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Private message to this peer.
    Private(String),
    /// Broadcast to this room.
    Room(String),
}

/// Decide where `draft` goes without emitting anything.
///
/// 1. Empty text fails with [`ValidationError::MessageRequired`].
/// 2. A target user routes privately, whatever the room.
/// 3. Otherwise a current room routes to the room.
/// 4. Otherwise fails with [`ValidationError::NoDestination`].
pub fn destination(
    draft: &OutboundDraft,
    current_room: Option<&str>,
) -> Result<Destination, ValidationError> {
    if draft.text.is_empty() {
        return Err(ValidationError::MessageRequired);
    }

    if let Some(receiver_id) = draft.target() {
        return Ok(Destination::Private(receiver_id.to_string()));
    }

    match current_room {
        Some(room_id) if !room_id.is_empty() => Ok(Destination::Room(room_id.to_string())),
        _ => Err(ValidationError::NoDestination),
    }
}

/// Build the request for `draft`. Room messages are sent as `local_identity`.
pub fn route(
    draft: &OutboundDraft,
    current_room: Option<&str>,
    local_identity: &str,
) -> Result<OutboundRequest, ValidationError> {
    let destination = destination(draft, current_room)?;
    request_for(&destination, &draft.text, local_identity)
}

fn request_for(
    destination: &Destination,
    text: &str,
    local_identity: &str,
) -> Result<OutboundRequest, ValidationError> {
    match destination {
        Destination::Private(receiver_id) => private_message(receiver_id, text),
        Destination::Room(room_id) => Ok(OutboundRequest::RoomMessage {
            room_id: room_id.clone(),
            message: text.to_string(),
            user_id: local_identity.to_string(),
        }),
    }
}

/// Build a private-message request.
///
/// Usable on its own, so it checks its own inputs.
pub fn private_message(receiver_id: &str, text: &str) -> Result<OutboundRequest, ValidationError> {
    if receiver_id.is_empty() || text.is_empty() {
        return Err(ValidationError::ReceiverRequired);
    }
    Ok(OutboundRequest::PrivateMessage {
        message: text.to_string(),
        receiver_id: receiver_id.to_string(),
    })
}

/// Route `draft`, emit the request and clear the draft text.
///
/// On error nothing is emitted and the draft is untouched.
pub fn send<E: Emit + ?Sized>(
    emitter: &mut E,
    draft: &mut OutboundDraft,
    current_room: Option<&str>,
    local_identity: &str,
) -> Result<Destination, ValidationError> {
    let destination = destination(draft, current_room)?;
    let request = request_for(&destination, &draft.text, local_identity)?;

    match &destination {
        Destination::Private(receiver_id) => info!(%receiver_id, "sending private message"),
        Destination::Room(room_id) => info!(%room_id, "sending room message"),
    }
    emitter.emit(request);
    draft.clear_text();
    Ok(destination)
}
