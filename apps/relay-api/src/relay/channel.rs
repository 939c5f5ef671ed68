//! A named channel: bounded history plus the set of live members.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use relay_common::ChatMessage;
use tokio::sync::mpsc;

use crate::error::RelayError;

use super::connection::{Frame, Identity};
use super::history::HistoryBuffer;

/// Outbound handle for one member connection.
#[derive(Debug)]
pub(super) struct Member {
    pub identity: Identity,
    pub outbound: mpsc::Sender<Frame>,
}

/// Everything guarded by the channel lock.
#[derive(Debug)]
pub(super) struct ChannelState {
    pub history: HistoryBuffer,
    /// Keyed by connection id. One identity may hold several entries.
    pub members: HashMap<String, Member>,
    /// Set once the registry has removed the channel; no further joins.
    pub closed: bool,
}

/// A broadcast domain. History and membership share one `parking_lot::Mutex`
/// so append, eviction, join, leave and snapshot are mutually exclusive per
/// channel while different channels never contend.
#[derive(Debug)]
pub struct Channel {
    name: String,
    state: Mutex<ChannelState>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(ChannelState {
                history: HistoryBuffer::new(),
                members: HashMap::new(),
                closed: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_count(&self) -> usize {
        self.state.lock().members.len()
    }

    /// Identities of the current members, one entry per connection.
    pub fn member_identities(&self) -> Vec<Identity> {
        self.state
            .lock()
            .members
            .values()
            .map(|m| m.identity.clone())
            .collect()
    }

    /// Oldest-first copy of the channel history.
    pub fn history(&self) -> Vec<Arc<ChatMessage>> {
        self.state.lock().history.snapshot()
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock()
    }

    /// Register a member and queue the history snapshot as its first frame.
    ///
    /// Snapshot and registration happen under the same lock as appends, so a
    /// message published concurrently lands either in the snapshot or in the
    /// queue after it, never both and never neither.
    pub(super) fn join(
        &self,
        connection_id: &str,
        identity: Identity,
        queue_capacity: usize,
    ) -> Result<mpsc::Receiver<Frame>, RelayError> {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));

        let mut state = self.state.lock();
        if state.closed {
            return Err(RelayError::ChannelNotFound(self.name.clone()));
        }

        let snapshot = state.history.snapshot();
        let entries: Vec<&ChatMessage> = snapshot.iter().map(|m| m.as_ref()).collect();
        let frame: Frame = serde_json::to_string(&entries)?.into();

        // Fresh queue with a live receiver: cannot be full or closed.
        let _ = tx.try_send(frame);

        state.members.insert(
            connection_id.to_string(),
            Member {
                identity,
                outbound: tx,
            },
        );
        Ok(rx)
    }

    /// Remove a member. Returns `false` if it was already gone.
    pub fn leave(&self, connection_id: &str) -> bool {
        self.state.lock().members.remove(connection_id).is_some()
    }

    /// Mark the channel closed if it has no members. Returns whether it did.
    pub(super) fn close_if_empty(&self) -> bool {
        let mut state = self.state.lock();
        if state.members.is_empty() {
            state.closed = true;
            true
        } else {
            false
        }
    }
}
