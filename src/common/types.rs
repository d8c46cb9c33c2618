use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender value that marks a message as written by the local user.
pub const LOCAL_SENDER: &str = "You";

/// Domain model đại diện một tin nhắn chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub text: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Builds a message authored by the local user.
    pub fn local(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: LOCAL_SENDER.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_local(&self) -> bool {
        self.sender == LOCAL_SENDER
    }
}

/// Trạng thái kết nối tới server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

/// Result of handing a message to the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Queued on a connected channel. Delivery is not acknowledged.
    Sent,
    /// The channel has not finished connecting, or the connection dropped.
    NotConnected,
    /// The channel was closed by the session.
    Closed,
    /// Blank input; nothing was appended or sent.
    Empty,
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }
}
