//! Background task driving the WebSocket to the relay.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use super::ChannelEvent;
use crate::protocol::{InboundEvent, OutboundRequest};

pub(super) type RelaySocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Pump frames between the socket and the manager's queues until either side
/// goes away.
///
/// A close requested through `shutdown` sends a close frame and ends quietly,
/// even while the event queue is full. Any other ending is reported as a final
/// [`ChannelEvent::Closed`].
pub(super) async fn run(
    socket: RelaySocket,
    mut outbound: mpsc::UnboundedReceiver<OutboundRequest>,
    events: mpsc::Sender<ChannelEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let (mut ws_write, mut ws_read) = socket.split();

    let reason = loop {
        tokio::select! {
            _ = &mut shutdown => break None,

            Some(request) = outbound.recv() => {
                match request.encode() {
                    Ok(frame) => {
                        debug!(event = request.name(), "sending frame");
                        if let Err(e) = ws_write.send(Message::Text(frame.into())).await {
                            break Some(format!("send failed: {e}"));
                        }
                    }
                    Err(e) => warn!(event = request.name(), error = %e, "failed to encode request"),
                }
            }

            frame = ws_read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match InboundEvent::decode(text.as_str()) {
                        Ok(event) => {
                            tokio::select! {
                                sent = events.send(ChannelEvent::Inbound(event)) => {
                                    if sent.is_err() {
                                        break Some("client went away".to_string());
                                    }
                                }
                                _ = &mut shutdown => break None,
                            }
                        }
                        Err(e) => warn!(error = %e, "skipping undecodable frame"),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        break Some(match frame {
                            Some(frame) if !frame.reason.is_empty() => {
                                format!("closed by relay: {}", frame.reason.as_str())
                            }
                            _ => "closed by relay".to_string(),
                        });
                    }
                    Some(Ok(Message::Binary(_))) => debug!("binary frames not supported"),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Some(format!("socket error: {e}")),
                    None => break Some("connection lost".to_string()),
                }
            }
        }
    };

    let Some(reason) = reason else {
        let _ = ws_write.send(Message::Close(None)).await;
        debug!("transport closed by client");
        return;
    };

    debug!(%reason, "transport loop finished");
    let _ = events.send(ChannelEvent::Closed { reason }).await;
}
