use super::types::{ChatMessage, ConnectionState};

/// Sự kiện từ tầng mạng gửi lên session.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    MessageReceived(ChatMessage),
    StateChanged(ConnectionState),
}
