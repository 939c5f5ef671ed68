//! Connection gate: validate an upgrade attempt and admit it to a channel.

use relay_common::PrefixedId;
use tokio::sync::mpsc;

use crate::error::RelayError;

use super::connection::{Connection, Frame, Identity};
use super::registry::ChannelRegistry;

/// A connection that passed the gate, with the receiving end of its
/// outbound queue. The history snapshot is already queued as the first frame.
#[derive(Debug)]
pub struct Admission {
    pub connection: Connection,
    pub outbound: mpsc::Receiver<Frame>,
}

/// Run the admission checks in order: identity, target, channel lookup.
/// Any failure is final; the caller terminates the attempt.
pub fn admit(
    registry: &ChannelRegistry,
    identity: Option<Identity>,
    channel_name: Option<&str>,
    queue_capacity: usize,
) -> Result<Admission, RelayError> {
    let identity = identity.ok_or(RelayError::Unauthenticated)?;
    let name = parse_channel_name(channel_name).ok_or(RelayError::InvalidTarget)?;
    let channel = registry
        .get(name)
        .ok_or_else(|| RelayError::ChannelNotFound(name.to_string()))?;

    let connection_id = Connection::generate();
    let outbound = channel.join(&connection_id, identity.clone(), queue_capacity)?;

    tracing::info!(
        channel = %name,
        connection_id = %connection_id,
        identity = %identity,
        "connection admitted"
    );

    Ok(Admission {
        connection: Connection::new(connection_id, identity, channel),
        outbound,
    })
}

fn parse_channel_name(raw: Option<&str>) -> Option<&str> {
    raw.filter(|name| !name.trim().is_empty())
}
