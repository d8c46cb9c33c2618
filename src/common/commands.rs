use super::types::ChatMessage;

/// Lệnh session gửi xuống tầng mạng.
#[derive(Debug, Clone)]
pub enum ChannelCommand {
    /// Emit the message under the `"message"` event.
    Send(ChatMessage),
    /// Disconnect the namespace and close the socket.
    Close,
}
