use std::collections::VecDeque;

use tokio::sync::{mpsc, watch};

use crate::common::{
    ChannelEvent, ChatMessage, ConnectionState, MessageIdGenerator, SendOutcome, SessionIdentity,
};
use crate::config::AppConfig;
use crate::network::MessageChannel;
use crate::storage::ConversationStore;

/// What applying one channel event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    /// A message was appended to the conversation.
    Appended,
    /// The server echoed one of our own messages; it was not appended again.
    EchoSuppressed,
    StateChanged(ConnectionState),
}

/// One live chat session: the connection, the conversation and the glue
/// that merges local sends with inbound messages.
///
/// Everything here runs on the caller's thread. The socket itself lives in
/// the channel's task and reaches the session only through `event_receiver`.
pub struct ChatSession {
    identity: SessionIdentity,
    store: ConversationStore,
    channel: MessageChannel,
    event_receiver: mpsc::UnboundedReceiver<ChannelEvent>,
    ids: MessageIdGenerator,
    state: ConnectionState,
    suppress_echo: bool,
    pending_echoes: EchoWindow,
    closed: bool,
}

impl ChatSession {
    /// Starts connecting and returns at once. Must be called inside a tokio
    /// runtime. An anonymous identity still connects.
    pub fn start(config: &AppConfig, identity: SessionIdentity) -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();
        let channel = MessageChannel::connect(&config.server_url, event_sender);

        log::info!(
            "Chat session started for {} against {}",
            identity.display_name(),
            config.server_url
        );

        Self {
            identity,
            store: ConversationStore::new(),
            channel,
            event_receiver,
            ids: MessageIdGenerator::new(),
            state: ConnectionState::Connecting,
            suppress_echo: config.suppress_echo,
            pending_echoes: EchoWindow::new(config.echo_window),
            closed: false,
        }
    }

    /// Composer callback. The message shows up in the conversation before
    /// any network activity, whatever the channel reports.
    pub fn send(&mut self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Empty;
        }

        let message = ChatMessage::local(self.ids.next_id(), text);
        self.store.append(message.clone());

        let key = (message.id, message.text.clone());
        let outcome = self.channel.send(message);
        match outcome {
            SendOutcome::Sent => {
                if self.suppress_echo {
                    self.pending_echoes.remember(key);
                }
            }
            other => log::info!("Message kept locally only ({other:?})"),
        }
        outcome
    }

    /// Applies every event already queued, without waiting. Returns how many
    /// messages were appended.
    pub fn pump(&mut self) -> usize {
        let mut appended = 0;
        while !self.closed {
            let Ok(event) = self.event_receiver.try_recv() else {
                break;
            };
            if self.apply(event) == SessionUpdate::Appended {
                appended += 1;
            }
        }
        appended
    }

    /// Waits for the next channel event and applies it. `None` once the
    /// session is closed or the channel has gone away.
    pub async fn next_event(&mut self) -> Option<SessionUpdate> {
        if self.closed {
            return None;
        }
        let event = self.event_receiver.recv().await?;
        Some(self.apply(event))
    }

    fn apply(&mut self, event: ChannelEvent) -> SessionUpdate {
        match event {
            ChannelEvent::MessageReceived(message) => {
                if self.is_own_echo(&message) {
                    log::debug!("Suppressing echo of message {}", message.id);
                    return SessionUpdate::EchoSuppressed;
                }
                self.store.append(message);
                SessionUpdate::Appended
            }
            ChannelEvent::StateChanged(state) => {
                log::info!("Connection {}", state.label());
                self.state = state;
                SessionUpdate::StateChanged(state)
            }
        }
    }

    fn is_own_echo(&mut self, message: &ChatMessage) -> bool {
        if !self.suppress_echo || !message.is_local() {
            return false;
        }
        self.pending_echoes.take(message.id, &message.text)
    }

    /// Closes the connection. Events still queued are discarded; later sends
    /// are appended locally and report `SendOutcome::Closed`.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.channel.close();
        self.event_receiver.close();
        self.state = ConnectionState::Disconnected;
        log::info!("Chat session for {} closed", self.identity.display_name());
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.store.iter()
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Last state seen through the event queue.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Live state straight from the channel, for callers that need to wait.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.channel.watch_state()
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// `(id, text)` of the most recent sends whose echo has not been seen.
/// Servers that broadcast to everyone but the sender never echo, so the
/// oldest keys are forgotten once `capacity` is reached.
#[derive(Debug)]
struct EchoWindow {
    keys: VecDeque<(i64, String)>,
    capacity: usize,
}

impl EchoWindow {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            keys: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn remember(&mut self, key: (i64, String)) {
        if self.keys.len() == self.capacity {
            self.keys.pop_front();
        }
        self.keys.push_back(key);
    }

    /// Removes the key if present, reporting whether it was.
    fn take(&mut self, id: i64, text: &str) -> bool {
        match self
            .keys
            .iter()
            .position(|(key_id, key_text)| *key_id == id && key_text == text)
        {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}
