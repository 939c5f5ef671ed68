pub mod id;
pub mod message;

pub use id::PrefixedId;
pub use message::ChatMessage;
