//! Connection-level value objects.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Channel used to push outbound text lines to one connection.
///
/// The receiving half lives in that connection's pusher task; a send to a
/// dropped receiver is the "failed send" that broadcasts must tolerate.
pub type OutboundChannel = mpsc::UnboundedSender<String>;

/// Authenticated user identity attached to a connection.
///
/// Resolved from the handshake token by a [`TokenValidator`]. Two
/// connections may carry the same `UserId` (same user, two tabs).
///
/// [`TokenValidator`]: super::TokenValidator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque handle for one live WebSocket connection.
///
/// Minted when the transport handshake succeeds, destroyed on disconnect.
/// Distinct from [`UserId`]: the handle identifies the socket, not the
/// person behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh handle for a newly accepted connection.
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
