//! WebSocket client session management.

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite, tungstenite::protocol::Message};

use crate::{
    error::ClientError,
    formatter::{Rendered, prompt, render_server_line},
    input::{Input, parse_input},
    ui::redisplay_prompt,
};

/// Run one WebSocket client session until the connection drops or the
/// user quits.
pub async fn run_client_session(url: &str, token: &str) -> Result<(), Box<dyn std::error::Error>> {
    // The token rides along as a query parameter; the server resolves it
    // to an identity before accepting the upgrade.
    let url = format!("{}?token={}", url, token);

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response)) if response.status().as_u16() == 401 => {
            return Err(Box::new(ClientError::AuthenticationRejected));
        }
        Err(e) => {
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
    };

    tracing::info!("Connected to chat server!");
    println!("\nType messages and press Enter to send. /help lists commands. Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    // Current room, shared between the read task (ROOM_UPDATE lines) and
    // the prompt.
    let current_room: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

    // Handle incoming messages
    let room_for_read = current_room.clone();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match render_server_line(&text) {
                        Rendered::Print(formatted) => {
                            print!("{}", formatted);
                        }
                        Rendered::SetRoom(room) => {
                            *room_for_read.lock().expect("room mutex poisoned") = room;
                        }
                    }
                    let room = room_for_read.lock().expect("room mutex poisoned").clone();
                    redisplay_prompt(room.as_deref());
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let room_for_prompt = current_room.clone();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            let room = room_for_prompt.lock().expect("room mutex poisoned").clone();
            match rl.readline(&prompt(room.as_deref())) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Turn input lines into protocol frames and send them
    let room_for_write = current_room.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            match parse_input(&line) {
                Input::Frame(frame) => {
                    if let Err(e) = write.send(Message::Text(frame.into())).await {
                        tracing::warn!("Failed to send message: {}", e);
                        write_error = true;
                        break;
                    }
                }
                Input::Usage(text) => {
                    println!("{}", text);
                    let room = room_for_write.lock().expect("room mutex poisoned").clone();
                    redisplay_prompt(room.as_deref());
                }
                Input::Quit => {
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
