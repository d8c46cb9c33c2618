use thiserror::Error;

/// Failures inside the message channel. These never cross the session API;
/// the channel task logs them and degrades to `ConnectionState::Disconnected`.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("invalid server address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme `{0}` (expected http, https, ws or wss)")]
    UnsupportedScheme(String),
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("failed to encode message: {0}")]
    Codec(#[from] serde_json::Error),
}

/// A text frame that could not be decoded as an Engine.IO / Socket.IO packet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("empty frame")]
    Empty,
    #[error("unknown engine packet type `{0}`")]
    UnknownEngineType(char),
    #[error("unknown socket packet type `{0}`")]
    UnknownSocketType(char),
    #[error("malformed packet payload: {0}")]
    Payload(String),
}
