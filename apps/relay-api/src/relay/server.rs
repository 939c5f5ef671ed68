//! WebSocket upgrade handler and per-connection event loop.

use axum::extract::rejection::PathRejection;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::auth::middleware::{AuthError, AuthUser};
use crate::error::RelayError;
use crate::AppState;

use super::broadcast;
use super::connection::{Connection, Frame, Identity};
use super::gate::{self, Admission};

/// Close codes (4000-range for application-level).
const CLOSE_NOT_AUTHENTICATED: u16 = 4003;
const CLOSE_CHANNEL_NOT_FOUND: u16 = 4004;
const CLOSE_INVALID_TARGET: u16 = 4005;
const CLOSE_UNKNOWN_ERROR: u16 = 4000;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/channel/{name}", get(ws_upgrade))
        .route("/channel/", get(ws_upgrade))
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    user: Result<AuthUser, AuthError>,
    target: Result<Path<String>, PathRejection>,
) -> impl IntoResponse {
    let identity = user.ok().map(|u| u.identity);
    // A missing or undecodable name reaches the gate as `None`.
    let channel_name = target.ok().map(|Path(name)| name);

    ws.on_upgrade(move |socket| handle_connection(socket, state, identity, channel_name))
}

async fn handle_connection(
    mut socket: WebSocket,
    state: AppState,
    identity: Option<Identity>,
    channel_name: Option<String>,
) {
    let admission = match gate::admit(
        &state.channels,
        identity,
        channel_name.as_deref(),
        state.config.outbound_queue_capacity,
    ) {
        Ok(admission) => admission,
        Err(e) => {
            tracing::debug!(channel = ?channel_name, reason = %e, "admission rejected");
            let (code, reason) = close_reason(&e);
            let _ = socket.send(close_message(code, reason)).await;
            return;
        }
    };

    let (ws_tx, ws_rx) = socket.split();
    let Admission {
        connection,
        outbound,
    } = admission;

    run_connection(&connection, ws_tx, ws_rx, outbound).await;

    connection.leave();
    tracing::info!(
        channel = %connection.channel().name(),
        connection_id = %connection.id(),
        identity = %connection.identity(),
        "connection ended"
    );
}

/// Drive one admitted connection until either half stops.
///
/// Outbound frames are written by a dedicated task so a stalled socket only
/// backs up this connection's queue.
async fn run_connection(
    connection: &Connection,
    ws_tx: SplitSink<WebSocket, Message>,
    mut ws_rx: SplitStream<WebSocket>,
    outbound: mpsc::Receiver<Frame>,
) {
    let mut writer = tokio::spawn(write_frames(ws_tx, outbound));

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        broadcast::handle_inbound(connection, text.as_str().as_bytes());
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        broadcast::handle_inbound(connection, &bytes);
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(?e, connection_id = %connection.id(), "ws read error");
                        break;
                    }
                }
            }

            // Writer finished: send failed, or the channel dropped this member.
            _ = &mut writer => break,
        }
    }

    writer.abort();
}

async fn write_frames(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Frame>,
) {
    while let Some(frame) = outbound.recv().await {
        if ws_tx.send(Message::Text(frame.to_string().into())).await.is_err() {
            return;
        }
    }
    // Queue closed by the channel: the member was removed.
    let _ = ws_tx
        .send(close_message(CLOSE_UNKNOWN_ERROR, "Removed from channel"))
        .await;
}

fn close_reason(err: &RelayError) -> (u16, &'static str) {
    match err {
        RelayError::Unauthenticated => (CLOSE_NOT_AUTHENTICATED, "Not authenticated"),
        RelayError::ChannelNotFound(_) => (CLOSE_CHANNEL_NOT_FOUND, "Channel not found"),
        RelayError::InvalidTarget => (CLOSE_INVALID_TARGET, "Invalid channel name"),
        _ => (CLOSE_UNKNOWN_ERROR, "Admission failed"),
    }
}

fn close_message(code: u16, reason: &str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: reason.to_string().into(),
    }))
}
