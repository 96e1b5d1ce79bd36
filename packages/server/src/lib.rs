//! Room-based WebSocket chat server library.
//!
//! Clients connect over a token-authenticated WebSocket, create and join
//! named rooms, and exchange plain text messages that are fanned out to
//! the other members of their room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
