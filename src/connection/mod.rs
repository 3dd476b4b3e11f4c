//! Connection manager for the relay channel.
//!
//! [`ConnectionManager`] owns the one WebSocket this client ever opens. The
//! socket itself lives in a background task; the manager talks to it through
//! an unbounded outbound queue, a bounded inbound event queue and a oneshot
//! shutdown signal. Nothing else gets a handle to the channel: other
//! components emit through [`Emit`] and the owner closes it.

mod transport;

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::protocol::{InboundEvent, OutboundRequest};
use crate::{ChatError, Result};

/// Fire-and-forget sink for requests to the relay.
pub trait Emit {
    /// Queue a request. Never blocks and never reports delivery.
    fn emit(&mut self, request: OutboundRequest);
}

/// Something that happened on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A decoded event from the relay.
    Inbound(InboundEvent),
    /// The channel is gone. Always the last event of a channel.
    Closed {
        /// Human-readable cause.
        reason: String,
    },
}

struct Channel {
    outbound: mpsc::UnboundedSender<OutboundRequest>,
    events: mpsc::Receiver<ChannelEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl Drop for Channel {
    fn drop(&mut self) {
        // Covers every exit path, including panics and early returns.
        self.task.abort();
    }
}

/// Owner of the single relay channel.
pub struct ConnectionManager {
    channel: Option<Channel>,
    attempted: bool,
    connect_timeout: Duration,
    shutdown_timeout: Duration,
    event_capacity: usize,
}

impl ConnectionManager {
    /// Create a manager with no channel.
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            channel: None,
            attempted: false,
            connect_timeout: config.connect_timeout(),
            shutdown_timeout: config.shutdown_timeout(),
            // tokio panics on a zero-capacity channel
            event_capacity: config.event_channel_capacity.max(1),
        }
    }

    /// Whether a channel is currently open.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Open the channel to `endpoint`.
    ///
    /// Returns `Ok(true)` if a channel was created and `Ok(false)` if this
    /// manager already opened (or tried to open) one. There is no reconnect:
    /// after a failure or close every further call is a no-op.
    pub async fn open(&mut self, endpoint: &str) -> Result<bool> {
        if self.attempted {
            debug!(endpoint, "channel already opened; ignoring open");
            return Ok(false);
        }
        self.attempted = true;

        info!(endpoint, "connecting to relay");
        let socket = match tokio::time::timeout(
            self.connect_timeout,
            tokio_tungstenite::connect_async(endpoint),
        )
        .await
        {
            Ok(Ok((socket, _response))) => socket,
            Ok(Err(e)) => {
                warn!(endpoint, error = %e, "failed to connect to relay");
                return Err(e.into());
            }
            Err(_) => {
                warn!(endpoint, "timed out connecting to relay");
                return Err(ChatError::Connection(format!(
                    "timed out after {:?} connecting to {endpoint}",
                    self.connect_timeout
                )));
            }
        };

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(self.event_capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(transport::run(socket, outbound_rx, event_tx, shutdown_rx));

        self.channel = Some(Channel {
            outbound: outbound_tx,
            events: event_rx,
            shutdown: Some(shutdown_tx),
            task,
        });
        info!(endpoint, "channel open");
        Ok(true)
    }

    /// Wait for the next channel event.
    ///
    /// Pends forever while no channel is open, so it can sit in a
    /// `tokio::select!` next to user input. Returns `None` once the transport
    /// has delivered its final event and gone away.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        let event = match self.channel.as_mut() {
            Some(channel) => channel.events.recv().await,
            None => std::future::pending().await,
        };
        if event.is_none() {
            self.channel = None;
        }
        event
    }

    /// Forget a channel the relay already closed.
    pub(crate) fn release(&mut self) {
        self.channel = None;
    }

    /// Close the channel.
    ///
    /// Sends a close frame and gives the transport task the configured
    /// shutdown timeout before aborting it. Closing an unopened or already
    /// closed channel does nothing.
    pub async fn close(&mut self) {
        let Some(mut channel) = self.channel.take() else {
            debug!("close requested with no open channel");
            return;
        };

        if let Some(shutdown) = channel.shutdown.take() {
            let _ = shutdown.send(());
        }
        if tokio::time::timeout(self.shutdown_timeout, &mut channel.task)
            .await
            .is_err()
        {
            warn!(timeout = ?self.shutdown_timeout, "transport did not stop in time; aborting");
        }
        info!("channel closed");
    }
}

impl Emit for ConnectionManager {
    fn emit(&mut self, request: OutboundRequest) {
        let Some(channel) = self.channel.as_ref() else {
            debug!(event = request.name(), "no open channel; dropping request");
            return;
        };
        let name = request.name();
        if channel.outbound.send(request).is_err() {
            debug!(event = name, "transport gone; dropping request");
        }
    }
}
