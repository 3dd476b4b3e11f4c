//! Test helpers for integration tests.
//!
//! Provides an in-process relay (TestRelay) speaking the same JSON frames as
//! the real one, plus helpers for driving a ChatClient against it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use relaychat::config::RelayConfig;
use relaychat::{ChatClient, InboundEvent, Notification, OutboundRequest};

/// Default timeout for test operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct RelayInner {
    /// Connected peers by assigned id.
    peers: HashMap<String, mpsc::UnboundedSender<Message>>,
    /// Room each peer last joined.
    rooms: HashMap<String, String>,
    /// Every request received, with the id of the peer that sent it.
    received: Vec<(String, OutboundRequest)>,
    /// Number of sockets ever accepted.
    accepted: usize,
    /// Number of close frames received from clients.
    close_frames: usize,
}

type RelayState = Arc<Mutex<RelayInner>>;

/// In-process relay bound to an ephemeral port.
pub struct TestRelay {
    addr: SocketAddr,
    state: RelayState,
    task: JoinHandle<()>,
}

impl TestRelay {
    /// Start a relay on 127.0.0.1.
    pub async fn start() -> Self {
        let state = RelayState::default();
        let router = Router::new()
            .route("/", get(relay_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { addr, state, task }
    }

    /// WebSocket endpoint of this relay.
    pub fn endpoint(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    /// Relay config pointing at this relay.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            endpoint: self.endpoint(),
            connect_timeout_secs: 5,
            shutdown_timeout_ms: 500,
            ..RelayConfig::default()
        }
    }

    /// Number of sockets the relay has accepted so far.
    pub fn accepted(&self) -> usize {
        self.state.lock().unwrap().accepted
    }

    /// Number of sockets currently connected.
    pub fn connected(&self) -> usize {
        self.state.lock().unwrap().peers.len()
    }

    /// Number of close frames clients have sent.
    pub fn close_frames(&self) -> usize {
        self.state.lock().unwrap().close_frames
    }

    /// Requests received from `peer_id`, in arrival order.
    pub fn received_from(&self, peer_id: &str) -> Vec<OutboundRequest> {
        self.state
            .lock()
            .unwrap()
            .received
            .iter()
            .filter(|(from, _)| from == peer_id)
            .map(|(_, request)| request.clone())
            .collect()
    }

    /// Wait until `peer_id` has sent at least `count` requests.
    pub async fn wait_for_requests(&self, peer_id: &str, count: usize) -> Vec<OutboundRequest> {
        self.wait_until(|relay| relay.received_from(peer_id).len() >= count)
            .await;
        self.received_from(peer_id)
    }

    /// Wait until `predicate` holds, panicking after [`DEFAULT_TIMEOUT`].
    pub async fn wait_until<F>(&self, predicate: F)
    where
        F: Fn(&Self) -> bool,
    {
        let waited = timeout(DEFAULT_TIMEOUT, async {
            while !predicate(self) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(waited.is_ok(), "relay condition not met in time");
    }

    /// Push a raw text frame to `peer_id`, valid or not.
    pub fn send_raw(&self, peer_id: &str, text: &str) {
        let inner = self.state.lock().unwrap();
        let peer = inner.peers.get(peer_id).expect("unknown peer");
        peer.send(Message::Text(text.to_string().into())).unwrap();
    }

    /// Push an event to `peer_id`.
    pub fn send_event(&self, peer_id: &str, event: &InboundEvent) {
        self.send_raw(peer_id, &serde_json::to_string(event).unwrap());
    }

    /// Close the socket of `peer_id` from the relay side.
    pub fn disconnect(&self, peer_id: &str) {
        let inner = self.state.lock().unwrap();
        if let Some(peer) = inner.peers.get(peer_id) {
            let _ = peer.send(Message::Close(None));
        }
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn relay_handler(ws: WebSocketUpgrade, State(state): State<RelayState>) -> Response {
    ws.on_upgrade(move |socket| relay_socket(socket, state))
}

async fn relay_socket(socket: WebSocket, state: RelayState) {
    let id = uuid::Uuid::new_v4().simple().to_string();
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    {
        let mut inner = state.lock().unwrap();
        inner.accepted += 1;
        inner.peers.insert(id.clone(), tx.clone());
    }

    let hello = InboundEvent::Connected { id: id.clone() };
    let _ = tx.send(frame(&hello));

    loop {
        tokio::select! {
            Some(msg) = rx.recv() => {
                let closing = matches!(msg, Message::Close(_));
                if ws_sender.send(msg).await.is_err() || closing {
                    break;
                }
            }

            incoming = ws_receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(request) = serde_json::from_str::<OutboundRequest>(&text) {
                        relay_request(&state, &id, request);
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    state.lock().unwrap().close_frames += 1;
                    break;
                }
                Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    let mut inner = state.lock().unwrap();
    inner.peers.remove(&id);
    inner.rooms.remove(&id);
}

fn relay_request(state: &RelayState, from: &str, request: OutboundRequest) {
    let mut inner = state.lock().unwrap();
    inner.received.push((from.to_string(), request.clone()));

    match request {
        OutboundRequest::SetUserId(_) => {}
        OutboundRequest::RoomJoin(room_id) => {
            inner.rooms.insert(from.to_string(), room_id);
        }
        OutboundRequest::RoomMessage {
            room_id,
            message,
            user_id,
        } => {
            let event = InboundEvent::RoomMessageReceived {
                message,
                sender: user_id,
            };
            for (peer_id, peer) in &inner.peers {
                if inner.rooms.get(peer_id) == Some(&room_id) {
                    let _ = peer.send(frame(&event));
                }
            }
        }
        OutboundRequest::PrivateMessage {
            message,
            receiver_id,
        } => {
            if let Some(peer) = inner.peers.get(&receiver_id) {
                let event = InboundEvent::PrivateMessageReceived {
                    message,
                    sender_id: from.to_string(),
                };
                let _ = peer.send(frame(&event));
            }
        }
    }
}

fn frame(event: &InboundEvent) -> Message {
    Message::Text(serde_json::to_string(event).unwrap().into())
}

/// Next notification from `client`, panicking on timeout or a silent event.
pub async fn next_notification(client: &mut ChatClient) -> Notification {
    let event = timeout(DEFAULT_TIMEOUT, client.next_event())
        .await
        .expect("timed out waiting for channel event")
        .expect("channel ended without a close event");
    client
        .handle_event(event)
        .expect("event produced no notification")
}

/// Connect a client to `relay` and wait for its identity.
pub async fn connected_client(relay: &TestRelay) -> (ChatClient, String) {
    connected_client_with(relay, &relay.relay_config()).await
}

/// Like [`connected_client`], with a custom relay config.
pub async fn connected_client_with(relay: &TestRelay, config: &RelayConfig) -> (ChatClient, String) {
    let mut client = ChatClient::new(config);
    client.connect(&config.endpoint).await.unwrap();

    match next_notification(&mut client).await {
        Notification::Registered { identity } => (client, identity),
        other => panic!("Expected Registered, got {other:?}"),
    }
}
