#![allow(dead_code)]

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use socket_chat::network::wire::{self, Packet};
use socket_chat::{ChatSession, ConnectionState};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};

pub const WAIT: Duration = Duration::from_secs(5);

const OPEN_FRAME: &str =
    r#"0{"sid":"stub","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

/// Minimal Socket.IO server speaking to exactly one client.
pub struct StubServer {
    listener: TcpListener,
    pub url: String,
}

impl StubServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        Self {
            listener,
            url: format!("http://127.0.0.1:{port}"),
        }
    }

    /// Accepts the websocket without speaking Engine.IO yet.
    pub async fn accept_raw(&self) -> StubPeer {
        let (tcp, _) = timeout(WAIT, self.listener.accept())
            .await
            .expect("client connects in time")
            .expect("accept");
        let ws = accept_async(tcp).await.expect("websocket handshake");
        StubPeer { ws }
    }

    /// Sends the Engine.IO handshake and waits for the namespace connect.
    pub async fn accept_until_namespace(&self) -> StubPeer {
        let mut peer = self.accept_raw().await;
        peer.send_raw(OPEN_FRAME).await;
        assert_eq!(peer.next_text().await.as_deref(), Some("40"));
        peer
    }

    /// Full handshake advertising the given heartbeat, in milliseconds.
    pub async fn accept_with_heartbeat(&self, ping_interval: u64, ping_timeout: u64) -> StubPeer {
        let mut peer = self.accept_raw().await;
        let open = json!({
            "sid": "stub",
            "upgrades": [],
            "pingInterval": ping_interval,
            "pingTimeout": ping_timeout,
            "maxPayload": 1000000,
        });
        peer.send_raw(&format!("0{open}")).await;
        assert_eq!(peer.next_text().await.as_deref(), Some("40"));
        peer.send_raw(r#"40{"sid":"namespace"}"#).await;
        peer
    }

    /// Full handshake: the client ends up `Connected`.
    pub async fn accept(&self) -> StubPeer {
        let mut peer = self.accept_until_namespace().await;
        peer.send_raw(r#"40{"sid":"namespace"}"#).await;
        peer
    }
}

/// Address nobody listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub struct StubPeer {
    ws: WebSocketStream<TcpStream>,
}

impl StubPeer {
    pub async fn send_raw(&mut self, frame: &str) {
        self.ws
            .send(Message::Text(frame.to_string()))
            .await
            .expect("stub send");
    }

    pub async fn emit_message(&mut self, payload: &Value) {
        let frame = wire::encode_event(wire::MESSAGE_EVENT, payload).expect("encode");
        self.send_raw(&frame).await;
    }

    /// Next text frame, or `None` once the client is gone.
    pub async fn next_text(&mut self) -> Option<String> {
        loop {
            let frame = timeout(WAIT, self.ws.next()).await.expect("frame in time")?;
            match frame {
                Ok(Message::Text(text)) => return Some(text),
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
    }

    /// Payload of the next `"message"` event sent by the client.
    pub async fn expect_message(&mut self) -> Value {
        loop {
            let text = self.next_text().await.expect("client still connected");
            if let Ok(Packet::Event { name, mut args }) = wire::decode(&text) {
                if name == wire::MESSAGE_EVENT {
                    return args.remove(0);
                }
            }
        }
    }
}

pub fn remote_message(id: i64, sender: &str, text: &str, timestamp: &str) -> Value {
    json!({
        "id": id,
        "text": text,
        "sender": sender,
        "timestamp": timestamp,
    })
}

/// Applies session events until the connection reaches `target`.
pub async fn wait_for_state(session: &mut ChatSession, target: ConnectionState) {
    timeout(WAIT, async {
        while session.connection_state() != target {
            if session.next_event().await.is_none() {
                break;
            }
        }
    })
    .await
    .expect("state reached in time");
    assert_eq!(session.connection_state(), target);
}

/// Applies session events until the store holds `count` messages.
pub async fn wait_for_messages(session: &mut ChatSession, count: usize) {
    timeout(WAIT, async {
        while session.store().len() < count {
            if session.next_event().await.is_none() {
                break;
            }
        }
    })
    .await
    .expect("messages arrive in time");
    assert_eq!(session.store().len(), count);
}

pub fn texts(session: &ChatSession) -> Vec<(String, String)> {
    session
        .messages()
        .map(|message| (message.text.clone(), message.sender.clone()))
        .collect()
}
