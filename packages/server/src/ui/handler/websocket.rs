//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory},
    infrastructure::delivery::OutboundSender,
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
///
/// Identity is resolved upstream and handed over as-is.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let connection_id = ConnectionIdFactory::generate();

    // Queue first, record second: a record without a queue reads as gone to a broadcast.
    let (tx, rx) = mpsc::channel(state.outbound_buffer);
    state
        .delivery_channel
        .register(connection_id.clone(), tx.clone())
        .await;

    if let Err(e) = state
        .router
        .connect(connection_id.clone(), query.user_id, query.username)
        .await
    {
        tracing::error!("Connection '{}' rejected: {}", connection_id, e);
        state.delivery_channel.unregister(&connection_id).await;
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let failed_state = state.clone();
    let failed_id = connection_id.clone();
    Ok(ws
        .on_failed_upgrade(move |e| {
            tracing::warn!("WebSocket upgrade for '{}' failed: {}", failed_id, e);
            tokio::spawn(async move { teardown(&failed_state, &failed_id).await });
        })
        .on_upgrade(move |socket| handle_socket(socket, state, connection_id, tx, rx)))
}

/// Spawns a task that drains the outbound queue into the WebSocket sender.
///
/// Everything written to this client goes through the queue: broadcast pushes,
/// history pushes and acknowledgments. Once this task ends the queue is closed and
/// further deliveries to the connection report it as gone.
///
/// # Arguments
///
/// * `rx` - Outbound queue of this connection
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    tx: OutboundSender,
    rx: mpsc::Receiver<String>,
) {
    tracing::info!("Connection '{}' established", connection_id);
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let id_clone = connection_id.clone();

    // Spawn a task to handle requests from this client, one at a time
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received frame from '{}': {}", id_clone, text.as_str());
                    let ack = state_clone
                        .router
                        .handle_frame(&id_clone, text.as_str())
                        .await;
                    let ack_json = match serde_json::to_string(&ack) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to encode ack: {}", e);
                            continue;
                        }
                    };
                    if !enqueue_ack(&tx, ack_json, state_clone.delivery_timeout).await {
                        tracing::warn!("Connection '{}' stopped reading, closing", id_clone);
                        break;
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    teardown(&state, &connection_id).await;
}

/// Queue an acknowledgment behind any pending pushes.
///
/// Returns `false` when the queue is closed or stays full for longer than `timeout`.
async fn enqueue_ack(tx: &OutboundSender, ack_json: String, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, tx.send(ack_json)).await,
        Ok(Ok(()))
    )
}

/// Drop the outbound queue and the registry record of a connection.
///
/// A registry failure is only logged; the channel is gone either way.
async fn teardown(state: &AppState, connection_id: &ConnectionId) {
    state.delivery_channel.unregister(connection_id).await;
    match state.router.disconnect(connection_id).await {
        Ok(()) => tracing::info!("Connection '{}' closed", connection_id),
        Err(e) => tracing::warn!(
            "Connection '{}' closed, but registry cleanup failed: {}",
            connection_id,
            e
        ),
    }
}
