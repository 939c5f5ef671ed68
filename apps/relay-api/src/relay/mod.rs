//! Channel broadcast engine: registry, admission, history and fan-out.

pub mod broadcast;
pub mod channel;
pub mod connection;
pub mod gate;
pub mod history;
pub mod registry;
pub mod server;

pub use channel::Channel;
pub use connection::{Connection, Identity};
pub use registry::ChannelRegistry;
