//! Channel registry: name → channel, with create/lookup/delete.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::RelayError;

use super::channel::Channel;

/// Shared map of all live channels.
///
/// `DashMap` shards guard only creation, lookup and deletion; channel
/// internals are behind each channel's own lock.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: DashMap<String, Arc<Channel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Names of all channels, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Create a channel unless one with this name already exists.
    /// Returns `true` if a new channel was created.
    pub fn create(&self, name: &str) -> bool {
        let mut created = false;
        self.channels.entry(name.to_string()).or_insert_with(|| {
            created = true;
            Arc::new(Channel::new(name))
        });
        if created {
            tracing::info!(channel = %name, "channel created");
        }
        created
    }

    pub fn get(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels.get(name).map(|e| Arc::clone(e.value()))
    }

    /// Delete a channel that has no members.
    ///
    /// Missing channels are a successful no-op (`Ok(false)`). The emptiness
    /// check and the removal happen under the shard lock, and the channel is
    /// marked closed so an admission racing with the delete cannot join it.
    pub fn delete(&self, name: &str) -> Result<bool, RelayError> {
        let mut occupied = false;
        let removed = self.channels.remove_if(name, |_, channel| {
            let closed = channel.close_if_empty();
            occupied = !closed;
            closed
        });

        if occupied {
            tracing::info!(channel = %name, "channel deletion rejected: members present");
            return Err(RelayError::ChannelNotEmpty(name.to_string()));
        }
        if removed.is_some() {
            tracing::info!(channel = %name, "channel deleted");
        }
        Ok(removed.is_some())
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
