//! WebSocket connection handlers and the HTTP sidecar endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{AuthError, ConnectionId, RoomInfo, TokenValidator, UserId};

use super::state::{AppState, ConnectQuery};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Resolve an identity before anything touches the manager; no identity,
    // no connection.
    let user_id = match resolve_identity(state.token_validator.as_ref(), query.token.as_deref())
        .await
    {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!(error = %e, "websocket authentication failed, rejecting connection");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    let connection = ConnectionId::mint();
    state.manager.connect(connection, user_id, tx).await;
    tracing::info!(%connection, user = %user_id, "client connected and registered");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection, user_id, rx)))
}

/// Resolve the `token` query parameter into an authenticated identity.
/// A missing token is rejected the same way an invalid one is.
pub(crate) async fn resolve_identity(
    validator: &dyn TokenValidator,
    token: Option<&str>,
) -> Result<UserId, AuthError> {
    let token = token.ok_or(AuthError::MissingToken)?;
    validator.validate(token).await
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This is the only writer to the socket: personal replies and room
/// broadcasts all funnel through the connection's channel, which keeps
/// per-recipient ordering.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
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
    connection: ConnectionId,
    user_id: UserId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender);

    // Welcome banner
    state
        .manager
        .send_personal(
            connection,
            &format!("[System] Welcome! You are connected as user {user_id}"),
        )
        .await;
    state
        .manager
        .send_personal(
            connection,
            "[System] Available commands: create_room, join_room, leave_room, close_room, list_rooms, message",
        )
        .await;

    let state_clone = state.clone();

    // Receive messages from this client and route them
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!(%connection, "received text: {}", text);
                    state_clone.chat.process(connection, user_id, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!(%connection, "client requested close");
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Transport gone: deterministic cleanup, no user-visible reply
    state.manager.disconnect(connection).await;
    tracing::info!(%connection, user = %user_id, "client disconnected");
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Snapshot of the open rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomInfo>> {
    Json(state.manager.get_active_rooms().await)
}
