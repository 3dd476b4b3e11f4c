//! Relay event types and their JSON frame encoding.
//!
//! Every event travels as one WebSocket text frame holding
//! `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Requests sent from the client to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum OutboundRequest {
    /// Announce the relay-assigned identity so the relay can address us.
    #[serde(rename = "set-user-id")]
    SetUserId(String),

    /// Join a room.
    #[serde(rename = "room-join")]
    RoomJoin(String),

    /// Broadcast a message to a room.
    #[serde(rename = "send-room-message")]
    RoomMessage {
        /// Room to broadcast to.
        #[serde(rename = "roomId")]
        room_id: String,
        /// Message text.
        message: String,
        /// Identity of the sender.
        #[serde(rename = "userId")]
        user_id: String,
    },

    /// Direct message to a single peer.
    #[serde(rename = "private-message")]
    PrivateMessage {
        /// Message text.
        message: String,
        /// Identity of the receiving peer.
        #[serde(rename = "receiverSocketId")]
        receiver_id: String,
    },
}

impl OutboundRequest {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            OutboundRequest::SetUserId(_) => "set-user-id",
            OutboundRequest::RoomJoin(_) => "room-join",
            OutboundRequest::RoomMessage { .. } => "send-room-message",
            OutboundRequest::PrivateMessage { .. } => "private-message",
        }
    }

    /// Encode as a JSON text frame.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Events delivered by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum InboundEvent {
    /// Channel established; carries the identity the relay assigned to us.
    #[serde(rename = "connect")]
    Connected {
        /// Assigned identity.
        id: String,
    },

    /// A peer sent us a private message.
    #[serde(rename = "receive-private-message")]
    PrivateMessageReceived {
        /// Message text.
        message: String,
        /// Identity of the sending peer.
        #[serde(rename = "senderId")]
        sender_id: String,
    },

    /// A message was broadcast to our room.
    #[serde(rename = "receive-room-message")]
    RoomMessageReceived {
        /// Message text.
        message: String,
        /// Identity of the sender.
        sender: String,
    },
}

impl InboundEvent {
    /// Decode a JSON text frame.
    pub fn decode(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}
