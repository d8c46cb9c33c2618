use std::time::Duration;

use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::common::{ChannelCommand, ChannelEvent, ChatMessage, ConnectionState, SendOutcome};
use crate::error::ChannelError;

use super::transport::{build_endpoint, open_transport};
use super::wire::{self, CONNECT_FRAME, DISCONNECT_FRAME, MESSAGE_EVENT, PONG_FRAME, Packet};

/// Handle to the single live connection owned by a chat session.
///
/// The socket is driven by a spawned task. The handle only talks to it
/// through an unbounded command queue, so `send` never blocks the caller.
pub struct MessageChannel {
    command_sender: mpsc::UnboundedSender<ChannelCommand>,
    state: watch::Receiver<ConnectionState>,
    closed: bool,
}

impl MessageChannel {
    /// Starts a single connection attempt and returns immediately. Inbound
    /// messages and state changes are pushed to `event_sender`.
    pub fn connect(server_url: &str, event_sender: mpsc::UnboundedSender<ChannelEvent>) -> Self {
        let (command_sender, command_receiver) = mpsc::unbounded_channel();
        let (state_sender, state) = watch::channel(ConnectionState::Connecting);

        let driver = ChannelDriver {
            event_sender,
            command_receiver,
            state: state_sender,
            heartbeat: None,
        };
        let server_url = server_url.to_string();
        tokio::spawn(async move {
            driver.run(server_url).await;
        });

        Self {
            command_sender,
            state,
            closed: false,
        }
    }

    /// Hands the message to the socket task. Rejected unless the namespace
    /// connect has completed; nothing is buffered for later.
    pub fn send(&self, message: ChatMessage) -> SendOutcome {
        if self.closed {
            return SendOutcome::Closed;
        }
        if *self.state.borrow() != ConnectionState::Connected {
            log::debug!("Dropping message {} sent before connect", message.id);
            return SendOutcome::NotConnected;
        }

        match self.command_sender.send(ChannelCommand::Send(message)) {
            Ok(()) => SendOutcome::Sent,
            Err(err) => {
                log::warn!("Socket task is gone, message not sent: {err}");
                SendOutcome::NotConnected
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Connection status signal for callers that want to wait on it.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Asks the socket task to disconnect. In-flight sends are not drained.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // The task exits on its own after the close handshake.
        if self.command_sender.send(ChannelCommand::Close).is_err() {
            log::debug!("Socket task already finished");
        }
    }
}

impl Drop for MessageChannel {
    fn drop(&mut self) {
        self.close();
    }
}

struct ChannelDriver {
    event_sender: mpsc::UnboundedSender<ChannelEvent>,
    command_receiver: mpsc::UnboundedReceiver<ChannelCommand>,
    state: watch::Sender<ConnectionState>,
    /// Longest silence tolerated from the server, learned from the handshake.
    heartbeat: Option<Duration>,
}

enum Flow {
    Continue,
    Stop,
}

impl ChannelDriver {
    async fn run(mut self, server_url: String) {
        self.set_state(ConnectionState::Connecting);

        let stream = tokio::select! {
            result = connect_once(&server_url) => match result {
                Ok(stream) => stream,
                Err(err) => {
                    log::warn!("Connection to {server_url} failed: {err}");
                    self.set_state(ConnectionState::Disconnected);
                    return;
                }
            },
            _ = wait_for_close(&mut self.command_receiver) => {
                log::info!("Channel closed before connecting to {server_url}");
                self.set_state(ConnectionState::Disconnected);
                return;
            }
        };

        log::info!("Websocket to {server_url} opened");
        if let Err(err) = self.drive(stream).await {
            log::warn!("Connection to {server_url} ended with error: {err}");
        }
        self.set_state(ConnectionState::Disconnected);
        log::info!("Channel to {server_url} disconnected");
    }

    /// Pumps one open websocket until either side closes it or the server
    /// stays silent longer than its advertised heartbeat window.
    async fn drive<S>(&mut self, mut stream: S) -> Result<(), ChannelError>
    where
        S: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
    {
        loop {
            let heartbeat = self.heartbeat;
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(ChannelCommand::Send(message)) => {
                            let frame = wire::encode_event(MESSAGE_EVENT, &message)?;
                            stream.send(Message::Text(frame)).await?;
                        }
                        Some(ChannelCommand::Close) | None => {
                            stream.send(Message::Text(DISCONNECT_FRAME.to_string())).await?;
                            stream.close().await?;
                            return Ok(());
                        }
                    }
                }
                frame = next_frame(&mut stream, heartbeat) => {
                    let Some(frame) = frame else {
                        log::warn!("No frame from server within {heartbeat:?}, dropping connection");
                        return Ok(());
                    };
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            if let Flow::Stop = self.handle_frame(&text, &mut stream).await? {
                                return Ok(());
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => return Ok(()),
                        Some(Ok(_)) => {}
                        Some(Err(err)) => return Err(err.into()),
                    }
                }
            }
        }
    }

    async fn handle_frame<S>(&mut self, text: &str, stream: &mut S) -> Result<Flow, ChannelError>
    where
        S: Sink<Message, Error = WsError> + Unpin,
    {
        let packet = match wire::decode(text) {
            Ok(packet) => packet,
            Err(err) => {
                log::warn!("Dropping undecodable frame: {err}");
                return Ok(Flow::Continue);
            }
        };

        match packet {
            Packet::Open(handshake) => {
                log::debug!("Engine handshake: {handshake}");
                self.heartbeat = wire::heartbeat_window(&handshake);
                stream.send(Message::Text(CONNECT_FRAME.to_string())).await?;
            }
            Packet::Ping => {
                stream.send(Message::Text(PONG_FRAME.to_string())).await?;
            }
            Packet::Connect(_) => {
                self.set_state(ConnectionState::Connected);
            }
            Packet::Event { name, args } if name == MESSAGE_EVENT => {
                if let Some(message) = decode_message(args) {
                    if self
                        .event_sender
                        .send(ChannelEvent::MessageReceived(message))
                        .is_err()
                    {
                        log::debug!("Session stopped listening, closing channel");
                        return Ok(Flow::Stop);
                    }
                }
            }
            Packet::Event { name, .. } => {
                log::debug!("Ignoring event `{name}`");
            }
            Packet::ConnectError(reason) => {
                log::warn!("Server refused namespace connect: {reason}");
                return Ok(Flow::Stop);
            }
            Packet::Disconnect | Packet::Close => {
                log::info!("Server closed the session");
                return Ok(Flow::Stop);
            }
            Packet::Pong | Packet::Ignored => {}
        }

        Ok(Flow::Continue)
    }

    fn set_state(&self, state: ConnectionState) {
        if *self.state.borrow() == state {
            return;
        }
        self.state.send_replace(state);
        let _ = self.event_sender.send(ChannelEvent::StateChanged(state));
    }
}

/// Next websocket frame. `None` means the heartbeat window elapsed first.
async fn next_frame<S>(
    stream: &mut S,
    heartbeat: Option<Duration>,
) -> Option<Option<Result<Message, WsError>>>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    match heartbeat {
        Some(window) => timeout(window, stream.next()).await.ok(),
        None => Some(stream.next().await),
    }
}

async fn connect_once(server_url: &str) -> Result<super::transport::SocketStream, ChannelError> {
    let endpoint = build_endpoint(server_url)?;
    log::info!("Connecting to {endpoint}");
    open_transport(&endpoint).await
}

/// Resolves once the session asks for a close (or drops the handle). Sends
/// cannot be issued while connecting, so anything else is discarded.
async fn wait_for_close(commands: &mut mpsc::UnboundedReceiver<ChannelCommand>) {
    loop {
        match commands.recv().await {
            Some(ChannelCommand::Close) | None => return,
            Some(ChannelCommand::Send(message)) => {
                log::debug!("Discarding message {} queued while connecting", message.id);
            }
        }
    }
}

/// Payload of an inbound `"message"` event. Malformed payloads are dropped.
fn decode_message(args: Vec<serde_json::Value>) -> Option<ChatMessage> {
    let Some(payload) = args.into_iter().next() else {
        log::warn!("Dropping `message` event without payload");
        return None;
    };

    match serde_json::from_value::<ChatMessage>(payload) {
        Ok(message) if message.text.trim().is_empty() => {
            log::warn!("Dropping message {} with empty text", message.id);
            None
        }
        Ok(message) => Some(message),
        Err(err) => {
            log::warn!("Dropping malformed message payload: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_valid_payload() {
        let message = decode_message(vec![json!({
            "id": 5,
            "text": "hey",
            "sender": "Alice",
            "timestamp": "2025-11-02T10:20:35Z"
        })])
        .expect("message");
        assert_eq!(message.text, "hey");
    }

    #[test]
    fn drops_missing_or_invalid_payloads() {
        assert!(decode_message(Vec::new()).is_none());
        assert!(decode_message(vec![json!("just a string")]).is_none());
        assert!(
            decode_message(vec![json!({
                "id": 5,
                "text": "   ",
                "sender": "Alice",
                "timestamp": "2025-11-02T10:20:35Z"
            })])
            .is_none()
        );
    }
}
