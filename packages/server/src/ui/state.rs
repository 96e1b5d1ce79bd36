//! Server state and connection query types.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::TokenValidator;
use crate::infrastructure::ConnectionManager;
use crate::usecase::ChatService;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// Shared application state
pub struct AppState {
    /// Connection registry and room table
    pub manager: Arc<ConnectionManager>,
    /// Message routing service
    pub chat: ChatService,
    /// Handshake authentication seam
    pub token_validator: Arc<dyn TokenValidator>,
}
