// src/application/ports/security.rs
use crate::application::{ApplicationResult, dto::AuthenticatedUser};
use async_trait::async_trait;

/// Resolves a bearer credential to the acting identity and its capabilities.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser>;
}
