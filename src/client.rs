//! Chat client: the session, its channel and the inbound event dispatcher.
//!
//! Everything happens one step at a time. The owner either feeds the client a
//! channel event (from [`ChatClient::next_event`]) or performs a user action
//! ([`ChatClient::join_room`], [`ChatClient::send`]); each runs to completion
//! before the next.

use tracing::{debug, info};

use crate::chat::{router, Destination, OutboundDraft, RoomMessageEntry};
use crate::config::RelayConfig;
use crate::connection::{ChannelEvent, ConnectionManager, Emit};
use crate::protocol::InboundEvent;
use crate::session::{ConnectionState, Session};
use crate::Result;

/// What the presentation layer should show after an event.
#[derive(Debug, Clone)]
pub enum Notification {
    /// The relay assigned an identity and it was announced back.
    Registered {
        /// Assigned identity.
        identity: String,
    },
    /// A private message arrived. It is not stored anywhere.
    PrivateMessage {
        /// Identity of the sending peer.
        sender_id: String,
        /// Message text.
        message: String,
    },
    /// A room message was appended to the log.
    RoomMessage(RoomMessageEntry),
    /// The channel closed and will not come back.
    Disconnected {
        /// Human-readable cause.
        reason: String,
    },
}

/// Route one decoded relay event to its handler.
pub fn dispatch<E: Emit + ?Sized>(
    session: &mut Session,
    emitter: &mut E,
    event: InboundEvent,
) -> Option<Notification> {
    match event {
        InboundEvent::Connected { id } => {
            if !session.registrar.on_connected(emitter, &id) {
                return None;
            }
            info!(identity = %id, "connected to relay");
            session.local_identity = id;
            session.state = ConnectionState::Connected;
            Some(Notification::Registered {
                identity: session.local_identity.clone(),
            })
        }

        InboundEvent::PrivateMessageReceived { message, sender_id } => {
            info!(%sender_id, "private message received");
            Some(Notification::PrivateMessage { sender_id, message })
        }

        InboundEvent::RoomMessageReceived { message, sender } => {
            debug!(%sender, "room message received");
            let entry = session.log.append(sender, message);
            Some(Notification::RoomMessage(entry.clone()))
        }
    }
}

/// A chat client bound to at most one relay channel.
pub struct ChatClient {
    session: Session,
    connection: ConnectionManager,
}

impl ChatClient {
    /// Create a disconnected client.
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            session: Session::new(),
            connection: ConnectionManager::new(config),
        }
    }

    /// Session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Open the channel to `endpoint`.
    ///
    /// The session stays `Connecting` until the relay's `connect` event
    /// arrives. A second call is a no-op; a failed open leaves the session
    /// `Disconnected` for good.
    pub async fn connect(&mut self, endpoint: &str) -> Result<()> {
        if self.session.state != ConnectionState::Disconnected || self.connection.is_open() {
            debug!(endpoint, "connect ignored; channel already requested");
            return Ok(());
        }

        self.session.state = ConnectionState::Connecting;
        match self.connection.open(endpoint).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.session.state = ConnectionState::Disconnected;
                Ok(())
            }
            Err(e) => {
                self.session.state = ConnectionState::Disconnected;
                Err(e)
            }
        }
    }

    /// Wait for the next channel event. Pends forever while no channel is open.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        self.connection.next_event().await
    }

    /// Apply a channel event to the session.
    pub fn handle_event(&mut self, event: ChannelEvent) -> Option<Notification> {
        match event {
            ChannelEvent::Inbound(event) => dispatch(&mut self.session, &mut self.connection, event),
            ChannelEvent::Closed { reason } => {
                info!(%reason, "channel closed");
                self.session.state = ConnectionState::Disconnected;
                self.connection.release();
                Some(Notification::Disconnected { reason })
            }
        }
    }

    /// Join `room_id`. Empty ids are ignored and return false.
    pub fn join_room(&mut self, room_id: &str) -> bool {
        self.session.membership.join(&mut self.connection, room_id)
    }

    /// Route and send `draft`, clearing its text on success.
    pub fn send(&mut self, draft: &mut OutboundDraft) -> Result<Destination> {
        let destination = router::send(
            &mut self.connection,
            draft,
            self.session.membership.current(),
            &self.session.local_identity,
        )?;
        Ok(destination)
    }

    /// Close the channel. Safe to call at any time, any number of times.
    pub async fn close(&mut self) {
        self.connection.close().await;
        self.session.state = ConnectionState::Disconnected;
    }
}
