//! Integration tests driving a real server instance over WebSocket.
//!
//! Each test binds the router to an ephemeral port and talks to it with
//! tokio-tungstenite, exactly as a client process would.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite};
use uuid::Uuid;

use serambi_server::{
    domain::AbduBot,
    infrastructure::{ConnectionManager, UuidTokenValidator},
    ui::Server,
};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start a server on an ephemeral port and return its address.
async fn spawn_test_server() -> SocketAddr {
    let manager = Arc::new(ConnectionManager::new());
    let server = Server::new(manager, Arc::new(UuidTokenValidator), Arc::new(AbduBot));
    let app = server.router();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has a local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });

    addr
}

/// Connect a client with the given token.
async fn connect(addr: SocketAddr, token: &str) -> WsClient {
    let url = format!("ws://{}/ws?token={}", addr, token);
    let (stream, _response) = connect_async(&url).await.expect("handshake should succeed");
    stream
}

/// Receive the next text frame, with a timeout so a missing message fails
/// the test instead of hanging it.
async fn next_text(client: &mut WsClient) -> String {
    let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("connection closed unexpectedly")
        .expect("websocket error");
    match frame {
        tungstenite::protocol::Message::Text(text) => text.to_string(),
        other => panic!("expected a text frame, got {:?}", other),
    }
}

async fn send_frame(client: &mut WsClient, frame: &str) {
    client
        .send(tungstenite::protocol::Message::Text(frame.to_string().into()))
        .await
        .expect("send should succeed");
}

/// Read and check the two-line welcome banner.
async fn expect_welcome(client: &mut WsClient, user_id: &str) {
    assert_eq!(
        next_text(client).await,
        format!("[System] Welcome! You are connected as user {user_id}")
    );
    assert_eq!(
        next_text(client).await,
        "[System] Available commands: create_room, join_room, leave_room, close_room, list_rooms, message"
    );
}

#[tokio::test]
async fn test_health_endpoint_responds_ok() {
    // given:
    let addr = spawn_test_server().await;

    // when:
    let body: serde_json::Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .expect("request should succeed")
        .json()
        .await
        .expect("body should be JSON");

    // then:
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_connection_without_token_is_rejected() {
    // given:
    let addr = spawn_test_server().await;

    // when:
    let result = connect_async(format!("ws://{}/ws", addr)).await;

    // then: the upgrade is refused with 401
    match result {
        Err(tungstenite::Error::Http(response)) => {
            assert_eq!(response.status().as_u16(), 401);
        }
        other => panic!("expected an HTTP 401 rejection, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_connection_with_invalid_token_is_rejected() {
    // given:
    let addr = spawn_test_server().await;

    // when:
    let result = connect_async(format!("ws://{}/ws?token=not-a-token", addr)).await;

    // then:
    match result {
        Err(tungstenite::Error::Http(response)) => {
            assert_eq!(response.status().as_u16(), 401);
        }
        other => panic!("expected an HTTP 401 rejection, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_welcome_banner_on_connect() {
    // given:
    let addr = spawn_test_server().await;
    let token = Uuid::new_v4().to_string();

    // when:
    let mut client = connect(addr, &token).await;

    // then:
    expect_welcome(&mut client, &token).await;
}

#[tokio::test]
async fn test_lobby_scenario_create_join_chat_close() {
    // given: two authenticated clients
    let addr = spawn_test_server().await;
    let u1 = Uuid::new_v4().to_string();
    let u2 = Uuid::new_v4().to_string();
    let mut c1 = connect(addr, &u1).await;
    let mut c2 = connect(addr, &u2).await;
    expect_welcome(&mut c1, &u1).await;
    expect_welcome(&mut c2, &u2).await;

    // u1 creates "lobby"
    send_frame(&mut c1, r#"{"type":"create_room","data":{"room_name":"lobby"}}"#).await;
    assert_eq!(
        next_text(&mut c1).await,
        "[System] Room 'lobby' created successfully!"
    );

    // u2 cannot create it again
    send_frame(&mut c2, r#"{"type":"create_room","data":{"room_name":"lobby"}}"#).await;
    assert_eq!(next_text(&mut c2).await, "[System] Room 'lobby' already exists!");

    // u1 joins its own room
    send_frame(&mut c1, r#"{"type":"join_room","data":{"room_name":"lobby"}}"#).await;
    assert_eq!(
        next_text(&mut c1).await,
        "[System] Joined room 'lobby' successfully!"
    );
    assert_eq!(next_text(&mut c1).await, "ROOM_UPDATE:lobby");

    // u2 joins; u1 is notified
    send_frame(&mut c2, r#"{"type":"join_room","data":{"room_name":"lobby"}}"#).await;
    assert_eq!(
        next_text(&mut c2).await,
        "[System] Joined room 'lobby' successfully!"
    );
    assert_eq!(next_text(&mut c2).await, "ROOM_UPDATE:lobby");
    assert_eq!(
        next_text(&mut c1).await,
        format!("[System] User {u2} joined the room")
    );

    // u2 says "halo": echo to u2, relay to u1, bot answers the whole room
    send_frame(&mut c2, r#"{"type":"message","data":{"content":"halo"}}"#).await;
    assert_eq!(next_text(&mut c2).await, "You wrote: halo");
    assert_eq!(next_text(&mut c2).await, "Bot: apa kabar");
    assert_eq!(next_text(&mut c1).await, format!("User {u2} says: halo"));
    assert_eq!(next_text(&mut c1).await, "Bot: apa kabar");

    // the listing shows one room with two members
    send_frame(&mut c1, r#"{"type":"list_rooms"}"#).await;
    let listing = next_text(&mut c1).await;
    assert!(listing.starts_with("[System] Active Rooms:"));
    assert!(listing.contains(&format!("  - lobby (Creator: {u1}, Members: 2, Created: ")));

    // only the creator can close
    send_frame(&mut c2, r#"{"type":"close_room"}"#).await;
    assert_eq!(
        next_text(&mut c2).await,
        "[System] Only the room creator can close the room!"
    );

    send_frame(&mut c1, r#"{"type":"close_room"}"#).await;
    assert_eq!(
        next_text(&mut c1).await,
        "[System] Room 'lobby' closed successfully!"
    );
    assert_eq!(next_text(&mut c1).await, "ROOM_UPDATE:None");

    // both are roomless now: a chat message from u2 is refused
    send_frame(&mut c2, r#"{"type":"message","data":{"content":"halo"}}"#).await;
    assert_eq!(
        next_text(&mut c2).await,
        "[System] You need to join a room first to send messages!"
    );

    // and no rooms remain
    send_frame(&mut c1, r#"{"type":"list_rooms"}"#).await;
    assert_eq!(next_text(&mut c1).await, "[System] No active rooms available.");
}

#[tokio::test]
async fn test_close_room_while_roomless_changes_nothing() {
    // given: u1 sits in "lobby", u3 is roomless
    let addr = spawn_test_server().await;
    let u1 = Uuid::new_v4().to_string();
    let u3 = Uuid::new_v4().to_string();
    let mut c1 = connect(addr, &u1).await;
    let mut c3 = connect(addr, &u3).await;
    expect_welcome(&mut c1, &u1).await;
    expect_welcome(&mut c3, &u3).await;
    send_frame(&mut c1, r#"{"type":"create_room","data":{"room_name":"lobby"}}"#).await;
    next_text(&mut c1).await;

    // when:
    send_frame(&mut c3, r#"{"type":"close_room"}"#).await;

    // then: refused, room still listed
    assert_eq!(next_text(&mut c3).await, "[System] You are not in any room!");
    send_frame(&mut c3, r#"{"type":"list_rooms"}"#).await;
    let listing = next_text(&mut c3).await;
    assert!(listing.contains("- lobby "));
}

#[tokio::test]
async fn test_unknown_type_and_malformed_frames_get_error_replies() {
    // given:
    let addr = spawn_test_server().await;
    let token = Uuid::new_v4().to_string();
    let mut client = connect(addr, &token).await;
    expect_welcome(&mut client, &token).await;

    // when / then: unknown type
    send_frame(&mut client, r#"{"type":"ping"}"#).await;
    assert_eq!(
        next_text(&mut client).await,
        "[System] Unknown message type: ping"
    );

    // when / then: not JSON at all; the connection survives both
    send_frame(&mut client, "garbage").await;
    assert_eq!(
        next_text(&mut client).await,
        "[System] Invalid JSON format. Please send valid JSON."
    );
    send_frame(&mut client, r#"{"type":"list_rooms"}"#).await;
    assert_eq!(
        next_text(&mut client).await,
        "[System] No active rooms available."
    );
}

#[tokio::test]
async fn test_disconnect_cleans_membership_but_leaves_room_open() {
    // given: u1 and u2 in "lobby"
    let addr = spawn_test_server().await;
    let u1 = Uuid::new_v4().to_string();
    let u2 = Uuid::new_v4().to_string();
    let mut c1 = connect(addr, &u1).await;
    let mut c2 = connect(addr, &u2).await;
    expect_welcome(&mut c1, &u1).await;
    expect_welcome(&mut c2, &u2).await;
    send_frame(&mut c1, r#"{"type":"create_room","data":{"room_name":"lobby"}}"#).await;
    next_text(&mut c1).await;
    send_frame(&mut c1, r#"{"type":"join_room","data":{"room_name":"lobby"}}"#).await;
    next_text(&mut c1).await;
    next_text(&mut c1).await;
    send_frame(&mut c2, r#"{"type":"join_room","data":{"room_name":"lobby"}}"#).await;
    next_text(&mut c2).await;
    next_text(&mut c2).await;
    next_text(&mut c1).await; // join notice

    // when: u2 drops its connection
    c2.close(None).await.expect("close should succeed");

    // then: the room survives with one member; cleanup is asynchronous,
    // so poll the sidecar endpoint briefly
    let rooms_url = format!("http://{}/api/rooms", addr);
    let mut members = None;
    for _ in 0..40 {
        let rooms: serde_json::Value = reqwest::get(&rooms_url)
            .await
            .expect("request should succeed")
            .json()
            .await
            .expect("body should be JSON");
        let count = rooms[0]["members"].as_u64();
        if count == Some(1) {
            members = count;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(members, Some(1), "membership was not cleaned up");

    // the remaining member can still use the room
    send_frame(&mut c1, r#"{"type":"message","data":{"content":"xyz"}}"#).await;
    assert_eq!(next_text(&mut c1).await, "You wrote: xyz");
}

#[tokio::test]
async fn test_switching_rooms_leaves_the_previous_one() {
    // given: u1 in "alpha", with "bravo" also open
    let addr = spawn_test_server().await;
    let u1 = Uuid::new_v4().to_string();
    let mut c1 = connect(addr, &u1).await;
    expect_welcome(&mut c1, &u1).await;
    for frame in [
        r#"{"type":"create_room","data":{"room_name":"alpha"}}"#,
        r#"{"type":"create_room","data":{"room_name":"bravo"}}"#,
    ] {
        send_frame(&mut c1, frame).await;
        next_text(&mut c1).await;
    }
    send_frame(&mut c1, r#"{"type":"join_room","data":{"room_name":"alpha"}}"#).await;
    next_text(&mut c1).await;
    next_text(&mut c1).await;

    // when:
    send_frame(&mut c1, r#"{"type":"join_room","data":{"room_name":"bravo"}}"#).await;
    next_text(&mut c1).await;
    assert_eq!(next_text(&mut c1).await, "ROOM_UPDATE:bravo");

    // then: alpha is empty, bravo has the member
    let rooms: serde_json::Value = reqwest::get(format!("http://{}/api/rooms", addr))
        .await
        .expect("request should succeed")
        .json()
        .await
        .expect("body should be JSON");
    assert_eq!(rooms[0]["name"], "alpha");
    assert_eq!(rooms[0]["members"], 0);
    assert_eq!(rooms[1]["name"], "bravo");
    assert_eq!(rooms[1]["members"], 1);
}
