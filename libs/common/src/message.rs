//! Wire form of a relayed chat message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message as stored in channel history and pushed to members.
///
/// `sender` and `date` are stamped by the server on receipt; `payload` is the
/// JSON document the client sent, carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub date: DateTime<Utc>,
    pub payload: Value,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, date: DateTime<Utc>, payload: Value) -> Self {
        Self {
            sender: sender.into(),
            date,
            payload,
        }
    }
}
