//! Admitted connections and the identities they carry.

use std::fmt;
use std::sync::Arc;

use relay_common::id::prefix;
use relay_common::PrefixedId;
use serde::Serialize;

use super::channel::Channel;

/// A pre-serialized JSON frame queued for delivery to one connection.
pub type Frame = Arc<str>;

/// A verified user identity, as produced by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One admitted transport session bound to a single channel.
///
/// The channel only keeps the connection's id and outbound queue; the
/// transport task owns this value and drops it on teardown.
#[derive(Debug)]
pub struct Connection {
    id: String,
    identity: Identity,
    channel: Arc<Channel>,
}

impl Connection {
    pub(super) fn new(id: String, identity: Identity, channel: Arc<Channel>) -> Self {
        Self {
            id,
            identity,
            channel,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    /// Remove this connection from its channel. Safe to call more than once.
    pub fn leave(&self) -> bool {
        self.channel.leave(&self.id)
    }
}

impl PrefixedId for Connection {
    const PREFIX: &'static str = prefix::CONNECTION;
}
