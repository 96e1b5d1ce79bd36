//! CLI chat client library for Serambi.
//!
//! Turns stdin lines into protocol envelopes, renders the server's text
//! lines, and keeps the prompt in sync with the current room.

pub mod error;
pub mod formatter;
pub mod input;
pub mod runner;
pub mod session;
pub mod ui;
