//! Chat message routing.
//!
//! One handler per message type, plus the fallback for unknown types.
//! Handlers validate, call into the connection manager, and reply with
//! the `[System]` / `ROOM_UPDATE:` lines the client UI understands. No
//! failure here ever terminates the connection.

use std::sync::Arc;

use crate::domain::{AutoResponder, ConnectionId, RoomName, UserId};
use crate::infrastructure::ConnectionManager;

use super::Command;

/// Routes parsed commands from one connection to the room operations.
#[derive(Clone)]
pub struct ChatService {
    manager: Arc<ConnectionManager>,
    bot: Arc<dyn AutoResponder>,
}

impl ChatService {
    pub fn new(manager: Arc<ConnectionManager>, bot: Arc<dyn AutoResponder>) -> Self {
        Self { manager, bot }
    }

    /// Process one raw inbound text frame from `connection`.
    ///
    /// Malformed frames get a system error reply and change nothing.
    pub async fn process(&self, connection: ConnectionId, user_id: UserId, text: &str) {
        match Command::parse(text) {
            Ok(command) => self.dispatch(connection, user_id, command).await,
            Err(e) => {
                tracing::warn!(%connection, error = %e, "failed to parse inbound frame");
                self.manager
                    .send_personal(connection, "[System] Invalid JSON format. Please send valid JSON.")
                    .await;
            }
        }
    }

    async fn dispatch(&self, connection: ConnectionId, user_id: UserId, command: Command) {
        match command {
            Command::CreateRoom { room_name } => {
                self.handle_create_room(connection, user_id, room_name).await;
            }
            Command::CloseRoom => self.handle_close_room(connection).await,
            Command::JoinRoom { room_name } => {
                self.handle_join_room(connection, room_name).await;
            }
            Command::LeaveRoom => self.handle_leave_room(connection).await,
            Command::ListRooms => self.handle_list_rooms(connection).await,
            Command::Message { content } => {
                self.handle_message(connection, user_id, content).await;
            }
            Command::Unknown { kind } => self.handle_unknown(connection, kind).await,
        }
    }

    async fn handle_create_room(
        &self,
        connection: ConnectionId,
        user_id: UserId,
        room_name: Option<String>,
    ) {
        let Some(name) = valid_room_name(room_name) else {
            self.manager
                .send_personal(connection, "[System] Room name is required!")
                .await;
            return;
        };

        if self.manager.create_room(&name, user_id).await {
            self.manager
                .send_personal(
                    connection,
                    &format!("[System] Room '{name}' created successfully!"),
                )
                .await;
        } else {
            self.manager
                .send_personal(connection, &format!("[System] Room '{name}' already exists!"))
                .await;
        }
    }

    async fn handle_close_room(&self, connection: ConnectionId) {
        let Some(current) = self.manager.get_client_room(connection).await else {
            self.manager
                .send_personal(connection, "[System] You are not in any room!")
                .await;
            return;
        };

        if self.manager.close_room(&current, connection).await {
            self.manager
                .send_personal(
                    connection,
                    &format!("[System] Room '{current}' closed successfully!"),
                )
                .await;
            self.manager.send_personal(connection, "ROOM_UPDATE:None").await;
        } else {
            self.manager
                .send_personal(connection, "[System] Only the room creator can close the room!")
                .await;
        }
    }

    async fn handle_join_room(&self, connection: ConnectionId, room_name: Option<String>) {
        let Some(name) = valid_room_name(room_name) else {
            self.manager
                .send_personal(connection, "[System] Room name is required!")
                .await;
            return;
        };

        if self.manager.join_room(&name, connection).await {
            self.manager
                .send_personal(
                    connection,
                    &format!("[System] Joined room '{name}' successfully!"),
                )
                .await;
            self.manager
                .send_personal(connection, &format!("ROOM_UPDATE:{name}"))
                .await;
        } else {
            self.manager
                .send_personal(connection, &format!("[System] Room '{name}' does not exist!"))
                .await;
        }
    }

    async fn handle_leave_room(&self, connection: ConnectionId) {
        match self.manager.leave_room(connection).await {
            Some(left) => {
                self.manager
                    .send_personal(
                        connection,
                        &format!("[System] Left room '{left}' successfully!"),
                    )
                    .await;
                self.manager.send_personal(connection, "ROOM_UPDATE:None").await;
            }
            None => {
                self.manager
                    .send_personal(connection, "[System] You are not in any room!")
                    .await;
            }
        }
    }

    async fn handle_list_rooms(&self, connection: ConnectionId) {
        let rooms = self.manager.get_active_rooms().await;
        if rooms.is_empty() {
            self.manager
                .send_personal(connection, "[System] No active rooms available.")
                .await;
            return;
        }

        let mut listing = String::from("[System] Active Rooms:");
        for room in &rooms {
            listing.push_str(&format!(
                "\n  - {} (Creator: {}, Members: {}, Created: {})",
                room.name, room.creator_id, room.members, room.created_at
            ));
        }
        self.manager.send_personal(connection, &listing).await;
    }

    async fn handle_message(&self, connection: ConnectionId, user_id: UserId, content: String) {
        if content.is_empty() {
            self.manager
                .send_personal(connection, "[System] Message content cannot be empty!")
                .await;
            return;
        }

        if self.manager.get_client_room(connection).await.is_none() {
            self.manager
                .send_personal(
                    connection,
                    "[System] You need to join a room first to send messages!",
                )
                .await;
            return;
        }

        // echo to the sender, fan out to the rest of the room
        self.manager
            .send_personal(connection, &format!("You wrote: {content}"))
            .await;
        self.manager
            .broadcast_room_except(connection, &format!("User {user_id} says: {content}"))
            .await;

        // the bot answers into the whole room, sender included
        if let Some(reply) = self.bot.reply_to(&content) {
            self.manager
                .broadcast_room(connection, &format!("Bot: {reply}"))
                .await;
        }
    }

    async fn handle_unknown(&self, connection: ConnectionId, kind: String) {
        self.manager
            .send_personal(connection, &format!("[System] Unknown message type: {kind}"))
            .await;
    }
}

/// An absent or empty room name fails validation the same way.
fn valid_room_name(room_name: Option<String>) -> Option<RoomName> {
    room_name.and_then(|name| RoomName::new(name).ok())
}
