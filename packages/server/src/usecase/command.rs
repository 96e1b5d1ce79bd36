//! Inbound message envelope and command parsing.
//!
//! Clients send JSON text frames of the form
//! `{"type": "<message type>", "data": {...}}`. The envelope is parsed
//! into a closed [`Command`] enumeration; a type outside the enumeration
//! becomes [`Command::Unknown`] so the router can answer instead of
//! dropping the frame.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    data: Value,
}

/// `data` payload carrying a room name.
#[derive(Debug, Default, Deserialize)]
struct RoomTarget {
    room_name: Option<String>,
}

/// `data` payload carrying chat content.
#[derive(Debug, Default, Deserialize)]
struct ChatPayload {
    #[serde(default)]
    content: String,
}

/// One parsed inbound message.
///
/// Payload fields stay optional here; validation (missing name, empty
/// content) is the router's job, so the error replies live in one place.
#[derive(Debug, PartialEq)]
pub enum Command {
    CreateRoom { room_name: Option<String> },
    CloseRoom,
    JoinRoom { room_name: Option<String> },
    LeaveRoom,
    ListRooms,
    Message { content: String },
    Unknown { kind: String },
}

impl Command {
    /// Parse a raw text frame. `Err` means the frame was not valid JSON
    /// or not an envelope at all; a well-formed envelope always parses,
    /// unrecognized types included.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_str(text)?;
        Ok(Self::from_envelope(envelope))
    }

    fn from_envelope(envelope: Envelope) -> Self {
        let kind = envelope.kind.unwrap_or_else(|| "unknown".to_string());
        match kind.as_str() {
            "create_room" => Command::CreateRoom {
                room_name: room_target(envelope.data),
            },
            "close_room" => Command::CloseRoom,
            "join_room" => Command::JoinRoom {
                room_name: room_target(envelope.data),
            },
            "leave_room" => Command::LeaveRoom,
            "list_rooms" => Command::ListRooms,
            "message" => Command::Message {
                content: chat_content(envelope.data),
            },
            _ => Command::Unknown { kind },
        }
    }
}

/// A `room_name` of the wrong JSON type reads as missing.
fn room_target(data: Value) -> Option<String> {
    serde_json::from_value::<RoomTarget>(data)
        .unwrap_or_default()
        .room_name
}

/// A `content` of the wrong JSON type reads as empty.
fn chat_content(data: Value) -> String {
    serde_json::from_value::<ChatPayload>(data)
        .unwrap_or_default()
        .content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_room_with_name() {
        // when:
        let command =
            Command::parse(r#"{"type":"create_room","data":{"room_name":"lobby"}}"#).unwrap();

        // then:
        assert_eq!(
            command,
            Command::CreateRoom {
                room_name: Some("lobby".to_string())
            }
        );
    }

    #[test]
    fn test_parse_join_room_without_data() {
        // when:
        let command = Command::parse(r#"{"type":"join_room"}"#).unwrap();

        // then:
        assert_eq!(command, Command::JoinRoom { room_name: None });
    }

    #[test]
    fn test_parse_room_name_of_wrong_type_reads_as_missing() {
        // when:
        let command =
            Command::parse(r#"{"type":"join_room","data":{"room_name":42}}"#).unwrap();

        // then:
        assert_eq!(command, Command::JoinRoom { room_name: None });
    }

    #[test]
    fn test_parse_message_with_content() {
        // when:
        let command =
            Command::parse(r#"{"type":"message","data":{"content":"halo"}}"#).unwrap();

        // then:
        assert_eq!(
            command,
            Command::Message {
                content: "halo".to_string()
            }
        );
    }

    #[test]
    fn test_parse_message_without_content_reads_as_empty() {
        // when:
        let command = Command::parse(r#"{"type":"message","data":{}}"#).unwrap();

        // then:
        assert_eq!(
            command,
            Command::Message {
                content: String::new()
            }
        );
    }

    #[test]
    fn test_parse_plain_commands() {
        assert_eq!(
            Command::parse(r#"{"type":"close_room"}"#).unwrap(),
            Command::CloseRoom
        );
        assert_eq!(
            Command::parse(r#"{"type":"leave_room"}"#).unwrap(),
            Command::LeaveRoom
        );
        assert_eq!(
            Command::parse(r#"{"type":"list_rooms"}"#).unwrap(),
            Command::ListRooms
        );
    }

    #[test]
    fn test_parse_unknown_type_is_routed_to_fallback() {
        // when:
        let command = Command::parse(r#"{"type":"ping"}"#).unwrap();

        // then:
        assert_eq!(
            command,
            Command::Unknown {
                kind: "ping".to_string()
            }
        );
    }

    #[test]
    fn test_parse_missing_type_reads_as_unknown() {
        // when:
        let command = Command::parse(r#"{"data":{"content":"hi"}}"#).unwrap();

        // then:
        assert_eq!(
            command,
            Command::Unknown {
                kind: "unknown".to_string()
            }
        );
    }

    #[test]
    fn test_parse_extra_payload_fields_are_ignored() {
        // when:
        let command = Command::parse(
            r#"{"type":"create_room","data":{"room_name":"lobby","color":"red"}}"#,
        )
        .unwrap();

        // then:
        assert_eq!(
            command,
            Command::CreateRoom {
                room_name: Some("lobby".to_string())
            }
        );
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        // when:
        let result = Command::parse("not json at all");

        // then:
        assert!(result.is_err());
    }
}
