//! Room entity: a named, creator-owned group of connections sharing
//! broadcast scope.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use serambi_shared::time::timestamp_to_wib_datetime;

use super::{ConnectionId, OutboundChannel, UserId};

/// Room name validation errors
#[derive(Debug, Error, PartialEq)]
pub enum RoomNameError {
    #[error("room name must not be empty")]
    Empty,
}

/// Validated room name. Non-empty; used as the unique key in the room table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, RoomNameError> {
        if value.is_empty() {
            return Err(RoomNameError::Empty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of room metadata for listings and the HTTP sidecar.
#[derive(Debug, Clone, Serialize)]
pub struct RoomInfo {
    pub name: String,
    pub creator_id: UserId,
    pub members: usize,
    /// `YYYY-MM-DD HH:MM:SS` in WIB
    pub created_at: String,
}

/// One member of a room: the connection handle plus its outbound channel.
struct Member {
    connection: ConnectionId,
    sender: OutboundChannel,
}

/// A chat room.
///
/// Members are kept in join order. The member list never contains the same
/// connection twice. The room does not own its connections; the manager's
/// registry does. Only the creator identity may close the room, which is
/// enforced by the manager, not here.
pub struct Room {
    name: RoomName,
    creator: UserId,
    members: Vec<Member>,
    created_at: i64,
}

impl Room {
    pub fn new(name: RoomName, creator: UserId, created_at: i64) -> Self {
        Self {
            name,
            creator,
            members: Vec::new(),
            created_at,
        }
    }

    pub fn name(&self) -> &RoomName {
        &self.name
    }

    pub fn creator(&self) -> UserId {
        self.creator
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, connection: ConnectionId) -> bool {
        self.members.iter().any(|m| m.connection == connection)
    }

    /// Connection handles of the current members, in join order.
    pub fn member_connections(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.connection).collect()
    }

    /// Add a connection to the member list. Idempotent: adding an existing
    /// member is a no-op.
    pub fn add_connection(&mut self, connection: ConnectionId, sender: OutboundChannel) {
        if !self.contains(connection) {
            self.members.push(Member { connection, sender });
        }
    }

    /// Remove a connection from the member list. No-op when absent.
    pub fn remove_connection(&mut self, connection: ConnectionId) {
        self.members.retain(|m| m.connection != connection);
    }

    /// Send `message` to every current member, in join order.
    ///
    /// A failed send (member's pusher task already gone) is logged and
    /// skipped; it never prevents delivery to the remaining members.
    pub fn broadcast(&self, message: &str) {
        for member in &self.members {
            if member.sender.send(message.to_string()).is_err() {
                tracing::warn!(
                    room = %self.name,
                    connection = %member.connection,
                    "failed to push message to member, skipping"
                );
            }
        }
    }

    /// Same as [`broadcast`](Self::broadcast) but skips one connection,
    /// typically the sender of the message being fanned out.
    pub fn broadcast_except(&self, message: &str, excluded: ConnectionId) {
        for member in &self.members {
            if member.connection == excluded {
                continue;
            }
            if member.sender.send(message.to_string()).is_err() {
                tracing::warn!(
                    room = %self.name,
                    connection = %member.connection,
                    "failed to push message to member, skipping"
                );
            }
        }
    }

    /// Metadata snapshot for room listings.
    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            name: self.name.as_str().to_string(),
            creator_id: self.creator,
            members: self.members.len(),
            created_at: timestamp_to_wib_datetime(self.created_at),
        }
    }
}
