//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the handshake token
    #[error("Authentication rejected by the server, check the token")]
    AuthenticationRejected,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
