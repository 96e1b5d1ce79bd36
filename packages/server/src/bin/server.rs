//! Room-based WebSocket chat server.
//!
//! Clients authenticate with a token, then create, join, and chat in
//! named rooms.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin serambi-server
//! cargo run --bin serambi-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use serambi_server::{
    domain::AbduBot,
    infrastructure::{ConnectionManager, UuidTokenValidator},
    ui::Server,
};
use serambi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "serambi-server")]
#[command(about = "Room-based WebSocket chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let manager = Arc::new(ConnectionManager::new());
    let server = Server::new(manager, Arc::new(UuidTokenValidator), Arc::new(AbduBot));

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
