//! Broadcast engine: stamp inbound payloads, append to history, fan out.

use std::sync::Arc;

use chrono::Utc;
use relay_common::ChatMessage;
use serde_json::Value;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::RelayError;

use super::connection::{Connection, Frame};

/// Handle a raw inbound payload from an admitted connection.
///
/// Payloads that are not valid JSON are dropped without a reply; the
/// connection stays open. Returns the stored message when one was published.
pub fn handle_inbound(connection: &Connection, raw: &[u8]) -> Option<Arc<ChatMessage>> {
    let payload = match parse_payload(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(connection_id = %connection.id(), error = %e, "inbound payload dropped");
            return None;
        }
    };

    match publish(connection, payload) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::error!(connection_id = %connection.id(), error = %e, "publish failed");
            None
        }
    }
}

fn parse_payload(raw: &[u8]) -> Result<Value, RelayError> {
    serde_json::from_slice(raw).map_err(|_| RelayError::MalformedMessage)
}

/// Stamp `payload` with the connection's identity and the current time,
/// append it to the channel history and deliver it to every member,
/// including the sender.
///
/// The append and the enqueue to each member happen under the channel lock,
/// so every member sees messages in history order. Delivery never waits on a
/// socket: a member whose queue is closed or full is dropped from the
/// channel instead.
pub fn publish(connection: &Connection, payload: Value) -> Result<Arc<ChatMessage>, RelayError> {
    let channel = connection.channel();
    let mut state = channel.lock();

    let message = Arc::new(ChatMessage::new(
        connection.identity().as_str(),
        Utc::now(),
        payload,
    ));
    let frame: Frame = serde_json::to_string(message.as_ref())?.into();

    state.history.push(Arc::clone(&message));

    state.members.retain(|member_id, member| {
        match member.outbound.try_send(Arc::clone(&frame)) {
            Ok(()) => true,
            Err(e) => {
                let reason = match e {
                    TrySendError::Full(_) => "outbound queue full",
                    TrySendError::Closed(_) => "connection closed",
                };
                tracing::warn!(
                    channel = %channel.name(),
                    connection_id = %member_id,
                    identity = %member.identity,
                    reason,
                    "dropping member after failed delivery"
                );
                false
            }
        }
    });

    Ok(message)
}
