pub mod channel;
pub mod transport;
pub mod wire;

pub use channel::MessageChannel;
