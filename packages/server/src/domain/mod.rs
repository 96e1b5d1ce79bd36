//! Domain model for the chat server.
//!
//! Value objects, the room entity, and the trait seams the rest of the
//! crate depends on (token validation, auto-responder).

mod auth;
mod bot;
mod connection;
mod room;

pub use auth::{AuthError, TokenValidator};
pub use bot::{AbduBot, AutoResponder};
pub use connection::{ConnectionId, OutboundChannel, UserId};
pub use room::{Room, RoomInfo, RoomName, RoomNameError};

#[cfg(test)]
pub use auth::MockTokenValidator;
#[cfg(test)]
pub use bot::MockAutoResponder;
