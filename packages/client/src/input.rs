//! Input parsing for the client prompt.
//!
//! Pure functions that turn a line typed at the prompt into a protocol
//! envelope, a local usage hint, or a quit request.

use serde_json::json;

/// What the session loop should do with one line of input.
#[derive(Debug, PartialEq)]
pub enum Input {
    /// Send this JSON frame to the server
    Frame(String),
    /// Print this locally, nothing goes on the wire
    Usage(String),
    /// End the session
    Quit,
}

const USAGE: &str = "commands: /create <room>, /join <room>, /leave, /close, /rooms, /quit (anything else is sent as a chat message)";

/// Parse one trimmed, non-empty input line.
///
/// Slash commands map to the room-management message types; every other
/// line is sent as a chat message.
pub fn parse_input(line: &str) -> Input {
    let Some(command) = line.strip_prefix('/') else {
        return Input::Frame(
            json!({"type": "message", "data": {"content": line}}).to_string(),
        );
    };

    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "create" => room_command("create_room", arg, "usage: /create <room name>"),
        "join" => room_command("join_room", arg, "usage: /join <room name>"),
        "leave" => Input::Frame(json!({"type": "leave_room"}).to_string()),
        "close" => Input::Frame(json!({"type": "close_room"}).to_string()),
        "rooms" => Input::Frame(json!({"type": "list_rooms"}).to_string()),
        "quit" | "exit" => Input::Quit,
        "help" => Input::Usage(USAGE.to_string()),
        _ => Input::Usage(format!("unknown command: /{name}\n{USAGE}")),
    }
}

fn room_command(kind: &str, room_name: &str, usage: &str) -> Input {
    if room_name.is_empty() {
        return Input::Usage(usage.to_string());
    }
    Input::Frame(json!({"type": kind, "data": {"room_name": room_name}}).to_string())
}
