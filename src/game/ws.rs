use crate::game::core::messages::{ClientMessage, ServerMessage};
use crate::game::engine::{ArenaHandle, ArenaState};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Run one arena connection: catalog first, then a snapshot after every transition.
/// The connection's session is dropped when either side of the socket closes.
pub async fn handle_connection(socket: WebSocket, state: Arc<ArenaState>) {
    let session_id = uuid::Uuid::new_v4().to_string();
    info!(session_id, "New arena WebSocket connection");

    let (mut sender, receiver) = socket.split();
    let (tx, mut rx) = broadcast::channel::<ServerMessage>(32);

    let _ = tx.send(ServerMessage::Catalog(state.catalog().clone()));
    let arena = state.open_session(&session_id, tx.clone());

    // Task to send messages from the broadcast channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            debug!(?msg, "Sending message to client");
            let Ok(json) = serde_json::to_string(&msg) else {
                warn!(?msg, "Failed to serialize server message");
                continue;
            };
            if sender.send(Message::Text(json)).await.is_err() {
                return;
            }
        }
        // Every publisher is gone: the arena stopped or the client left
        let _ = sender.send(Message::Close(None)).await;
    });

    // Task to receive intents from the WebSocket and forward them to the arena
    let recv_task = tokio::spawn(receive_loop(receiver, tx, arena));

    // Wait for either task to complete
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    state.close_session(&session_id);
    info!(session_id, "Arena WebSocket connection closed");
}

async fn receive_loop(
    mut receiver: futures_util::stream::SplitStream<WebSocket>,
    tx: broadcast::Sender<ServerMessage>,
    arena: ArenaHandle,
) {
    loop {
        let next = tokio::select! {
            next = receiver.next() => next,
            _ = arena.closed() => {
                debug!("Arena stopped, ending connection");
                break;
            }
        };
        let Some(Ok(msg)) = next else {
            break;
        };
        let Message::Text(text) = msg else {
            debug!("Received non-text message, ignoring");
            continue;
        };

        debug!(raw = %text, "Received message");

        let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(client_msg) => client_msg,
            Err(err) => {
                warn!(raw = %text, %err, "Failed to parse client message");
                let _ = tx.send(ServerMessage::Error {
                    message: format!("unrecognized message: {err}"),
                });
                continue;
            }
        };

        if !arena.send(client_msg.into()).await {
            break;
        }
    }
}
