//! Message routing layer: envelope parsing and the handlers behind each
//! message type.

mod chat;
mod command;

pub use chat::ChatService;
pub use command::Command;
