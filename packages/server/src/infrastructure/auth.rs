//! Development token validator.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthError, TokenValidator, UserId};

/// Accepts any token that parses as a UUID and uses it as the identity.
///
/// A development and testing stand-in. Production deployments implement
/// [`TokenValidator`] against their own identity provider and hand it to
/// the server at construction time.
pub struct UuidTokenValidator;

#[async_trait]
impl TokenValidator for UuidTokenValidator {
    async fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        Uuid::parse_str(token)
            .map(UserId::new)
            .map_err(|_| AuthError::InvalidToken)
    }
}
