pub mod commands;
pub mod events;
pub mod identity;
pub mod ids;
pub mod types;

pub use commands::ChannelCommand;
pub use events::ChannelEvent;
pub use identity::{SessionIdentity, User};
pub use ids::MessageIdGenerator;
pub use types::{ChatMessage, ConnectionState, LOCAL_SENDER, SendOutcome};
