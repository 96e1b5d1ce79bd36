//! Rendering of server lines for terminal display.
//!
//! The server speaks plain text lines. Two shapes carry control meaning:
//! `[System] ...` lines are informational, and `ROOM_UPDATE:<room or None>`
//! tells the client to refresh its notion of the current room. Everything
//! else is chat content.

/// What the session loop should do with one incoming server line.
#[derive(Debug, PartialEq)]
pub enum Rendered {
    /// Print this to the terminal
    Print(String),
    /// Update the tracked current room (drives the prompt), print nothing
    SetRoom(Option<String>),
}

/// Interpret one text line received from the server.
pub fn render_server_line(line: &str) -> Rendered {
    if let Some(room) = line.strip_prefix("ROOM_UPDATE:") {
        if room == "None" {
            return Rendered::SetRoom(None);
        }
        return Rendered::SetRoom(Some(room.to_string()));
    }

    Rendered::Print(format!("\n{line}\n"))
}

/// The prompt string for the current room.
pub fn prompt(room: Option<&str>) -> String {
    match room {
        Some(room) => format!("{room}> "),
        None => "> ".to_string(),
    }
}
