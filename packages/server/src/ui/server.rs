//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::{AutoResponder, TokenValidator};
use crate::infrastructure::ConnectionManager;
use crate::usecase::ChatService;

use super::{
    handler::{get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Room-based WebSocket chat server.
///
/// Wires the connection manager, the message router, and the token
/// validator into an axum application.
///
/// # Example
///
/// ```ignore
/// let manager = Arc::new(ConnectionManager::new());
/// let server = Server::new(manager, Arc::new(UuidTokenValidator), Arc::new(AbduBot));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(
        manager: Arc<ConnectionManager>,
        token_validator: Arc<dyn TokenValidator>,
        bot: Arc<dyn AutoResponder>,
    ) -> Self {
        let chat = ChatService::new(manager.clone(), bot);
        Self {
            state: Arc::new(AppState {
                manager,
                chat,
                token_validator,
            }),
        }
    }

    /// Build the axum router. Integration tests bind this to an ephemeral
    /// port instead of going through [`run`](Self::run).
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // HTTP sidecar endpoints
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the chat server until a shutdown signal arrives.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws?token=<your token>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
