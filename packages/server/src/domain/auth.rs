//! Token validation seam.
//!
//! Authentication itself is an external collaborator: the server only
//! requires that the handshake token resolve to a [`UserId`] before a
//! connection is admitted. Deployments plug their identity provider in
//! behind the [`TokenValidator`] trait.

use async_trait::async_trait;
use thiserror::Error;

use super::UserId;

/// Handshake authentication errors
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    /// No token was supplied with the connection attempt
    #[error("authentication token is required")]
    MissingToken,

    /// The supplied token did not resolve to a user
    #[error("authentication token is invalid")]
    InvalidToken,
}

/// Resolves a transport-level token into an authenticated identity.
///
/// Failure is fatal for the connection attempt: no anonymous or partially
/// authenticated connection ever reaches the connection manager.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<UserId, AuthError>;
}
