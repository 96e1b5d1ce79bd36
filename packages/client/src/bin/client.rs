//! Interactive chat client for the Serambi server.
//!
//! Connects with an authentication token, then maps prompt input to the
//! chat protocol: `/create`, `/join`, `/leave`, `/close`, `/rooms` manage
//! rooms, and any other line is sent as a chat message. Automatically
//! reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin serambi-client -- --token b54f95ab-7ba7-4a34-a77c-6dbd1910b8ce
//! cargo run --bin serambi-client -- -t <token> -u ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;

use serambi_client::runner::run_client;
use serambi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "serambi-client")]
#[command(about = "CLI client for the Serambi chat server", long_about = None)]
struct Args {
    /// Authentication token presented during the handshake
    #[arg(short = 't', long)]
    token: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = run_client(args.url, args.token).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
