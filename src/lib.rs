//! Real-time chat client: one Socket.IO connection per session, an
//! append-only conversation, and optimistic echo of local sends.

pub mod common;
pub mod config;
pub mod error;
pub mod network;
pub mod session;
pub mod storage;
pub mod terminal;
pub mod ui;

pub use common::{ChatMessage, ConnectionState, LOCAL_SENDER, SendOutcome, SessionIdentity, User};
pub use config::AppConfig;
pub use error::{ChannelError, WireError};
pub use network::MessageChannel;
pub use session::{ChatSession, SessionUpdate};
pub use storage::ConversationStore;
