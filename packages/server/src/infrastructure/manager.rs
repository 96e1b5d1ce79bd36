//! In-memory connection registry and room table.
//!
//! The manager is the sole owner of all room state: the registry of live
//! connections, the room table, and the connection-to-room index. Every
//! mutation goes through its methods, and one mutex serializes them, so a
//! broadcast can never observe a half-applied join or leave.

use std::collections::HashMap;

use tokio::sync::Mutex;

use serambi_shared::time::{Clock, SystemClock};

use crate::domain::{ConnectionId, OutboundChannel, Room, RoomInfo, RoomName, UserId};

/// Registry entry for one live connection.
struct ConnectionEntry {
    user_id: UserId,
    sender: OutboundChannel,
}

#[derive(Default)]
struct ManagerState {
    /// connection -> authenticated identity and outbound channel
    connections: HashMap<ConnectionId, ConnectionEntry>,
    /// room name -> room
    rooms: HashMap<RoomName, Room>,
    /// connection -> name of the room it is currently in.
    /// Kept consistent with the member lists in `rooms`.
    client_rooms: HashMap<ConnectionId, RoomName>,
}

/// Orchestrates connection registration and room lifecycle.
///
/// One instance per server process, constructed explicitly and shared via
/// `Arc` with every connection task. A connection is in at most one room
/// at a time; switching rooms leaves the previous one as part of the same
/// locked operation.
pub struct ConnectionManager {
    state: Mutex<ManagerState>,
    clock: Box<dyn Clock>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Construct with an injected clock (room creation timestamps).
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(ManagerState::default()),
            clock,
        }
    }

    /// Register a live connection with its authenticated identity.
    ///
    /// The connection becomes eligible for room operations. Assumes an
    /// already-accepted transport; there is no failure case.
    pub async fn connect(
        &self,
        connection: ConnectionId,
        user_id: UserId,
        sender: OutboundChannel,
    ) {
        let mut state = self.state.lock().await;
        state
            .connections
            .insert(connection, ConnectionEntry { user_id, sender });
        tracing::debug!(%connection, user = %user_id, "connection registered");
    }

    /// Drop a connection from the registry and from its room, if any.
    ///
    /// The room itself stays open even when this leaves it empty. Idempotent:
    /// disconnecting an unknown connection is a no-op.
    pub async fn disconnect(&self, connection: ConnectionId) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if state.connections.remove(&connection).is_none() {
            return;
        }

        if let Some(room_name) = state.client_rooms.remove(&connection) {
            if let Some(room) = state.rooms.get_mut(&room_name) {
                room.remove_connection(connection);
            }
        }
        tracing::debug!(%connection, "connection deregistered");
    }

    /// Identity a connection authenticated as, while it is live.
    pub async fn identity(&self, connection: ConnectionId) -> Option<UserId> {
        let state = self.state.lock().await;
        state.connections.get(&connection).map(|e| e.user_id)
    }

    /// Push a text line to a single connection.
    ///
    /// Send failures are logged and swallowed; the recipient's pusher task
    /// being gone means a disconnect is already in flight.
    pub async fn send_personal(&self, connection: ConnectionId, message: &str) {
        let state = self.state.lock().await;
        match state.connections.get(&connection) {
            Some(entry) => {
                if entry.sender.send(message.to_string()).is_err() {
                    tracing::warn!(%connection, "failed to push personal message, channel closed");
                }
            }
            None => {
                tracing::warn!(%connection, "personal message to unknown connection dropped");
            }
        }
    }

    /// Create a room owned by `creator`. Returns `false` when a room with
    /// that name already exists; the existing room is left untouched.
    pub async fn create_room(&self, name: &RoomName, creator: UserId) -> bool {
        let mut state = self.state.lock().await;
        if state.rooms.contains_key(name) {
            return false;
        }
        let room = Room::new(name.clone(), creator, self.clock.now_wib_millis());
        state.rooms.insert(name.clone(), room);
        tracing::info!(room = %name, creator = %creator, "room created");
        true
    }

    /// Close a room. Only the creator's identity may do so; any other
    /// requester gets the same `false` as a missing room, with no detail
    /// about which check failed.
    ///
    /// On success every member becomes roomless. Their connections stay
    /// registered and live.
    pub async fn close_room(&self, name: &RoomName, requester: ConnectionId) -> bool {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let Some(room) = state.rooms.get(name) else {
            return false;
        };
        let requester_id = state.connections.get(&requester).map(|e| e.user_id);
        if requester_id != Some(room.creator()) {
            return false;
        }

        let room = state.rooms.remove(name).expect("presence checked above");
        for member in room.member_connections() {
            state.client_rooms.remove(&member);
        }
        tracing::info!(room = %name, "room closed");
        true
    }

    /// Join a room. Returns `false` when the room does not exist.
    ///
    /// A connection already in another room leaves it first; both steps
    /// happen under one lock, so no observer ever sees the connection in
    /// two rooms or in none. The other members are then notified, so the
    /// join notice reflects membership after the join.
    pub async fn join_room(&self, name: &RoomName, connection: ConnectionId) -> bool {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if !state.rooms.contains_key(name) {
            return false;
        }
        let Some(entry) = state.connections.get(&connection) else {
            tracing::warn!(%connection, "join from unregistered connection ignored");
            return false;
        };
        let user_id = entry.user_id;
        let sender = entry.sender.clone();

        // implicit leave: drop membership in the previous room, silently
        if let Some(old) = state.client_rooms.remove(&connection) {
            if let Some(previous) = state.rooms.get_mut(&old) {
                previous.remove_connection(connection);
            }
        }

        state.client_rooms.insert(connection, name.clone());
        let room = state.rooms.get_mut(name).expect("presence checked above");
        room.add_connection(connection, sender);
        room.broadcast_except(&format!("[System] User {user_id} joined the room"), connection);
        tracing::info!(room = %name, user = %user_id, "user joined room");
        true
    }

    /// Leave the current room. Returns the room that was left, or `None`
    /// when the connection was not in any room.
    ///
    /// The remaining members are notified; the leaver is already out of
    /// the member list when the notice is broadcast.
    pub async fn leave_room(&self, connection: ConnectionId) -> Option<RoomName> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let room_name = state.client_rooms.remove(&connection)?;
        let user_id = state.connections.get(&connection).map(|e| e.user_id);
        if let Some(room) = state.rooms.get_mut(&room_name) {
            room.remove_connection(connection);
            if let Some(user_id) = user_id {
                room.broadcast(&format!("[System] User {user_id} left the room"));
                tracing::info!(room = %room_name, user = %user_id, "user left room");
            }
        }
        Some(room_name)
    }

    /// Fan a line out to the room the connection is in, every member
    /// included. No-op when the connection is roomless.
    pub async fn broadcast_room(&self, connection: ConnectionId, message: &str) {
        let guard = self.state.lock().await;
        if let Some(room_name) = guard.client_rooms.get(&connection) {
            if let Some(room) = guard.rooms.get(room_name) {
                room.broadcast(message);
            }
        }
    }

    /// Fan a line out to the room the connection is in, skipping the
    /// connection itself. No-op when the connection is roomless.
    pub async fn broadcast_room_except(&self, connection: ConnectionId, message: &str) {
        let guard = self.state.lock().await;
        if let Some(room_name) = guard.client_rooms.get(&connection) {
            if let Some(room) = guard.rooms.get(room_name) {
                room.broadcast_except(message, connection);
            }
        }
    }

    /// Snapshot of every open room, sorted by name.
    pub async fn get_active_rooms(&self) -> Vec<RoomInfo> {
        let state = self.state.lock().await;
        let mut rooms: Vec<RoomInfo> = state.rooms.values().map(Room::info).collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        rooms
    }

    /// Name of the room the connection is currently in, if any.
    pub async fn get_client_room(&self, connection: ConnectionId) -> Option<RoomName> {
        let state = self.state.lock().await;
        state.client_rooms.get(&connection).cloned()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
