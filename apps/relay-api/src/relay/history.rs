//! Bounded per-channel message history.

use std::collections::VecDeque;
use std::sync::Arc;

use relay_common::ChatMessage;

/// Maximum number of messages retained per channel.
pub const HISTORY_CAPACITY: usize = 100;

/// Append-only FIFO log of the most recent messages of a channel.
///
/// Entries are shared (`Arc`) so a snapshot can be handed to a joining
/// connection without copying payloads.
#[derive(Debug)]
pub struct HistoryBuffer {
    entries: VecDeque<Arc<ChatMessage>>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, evicting the oldest entries once over capacity.
    pub fn push(&mut self, message: Arc<ChatMessage>) {
        self.entries.push_back(message);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Oldest-first copy of the current contents.
    pub fn snapshot(&self) -> Vec<Arc<ChatMessage>> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
