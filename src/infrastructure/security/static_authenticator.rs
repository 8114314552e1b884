use std::collections::HashMap;

use async_trait::async_trait;

use crate::application::{
    ApplicationResult, dto::AuthenticatedUser, error::ApplicationError,
    ports::security::Authenticator,
};

/// Fixed token table, for local tools and tests.
#[derive(Default)]
pub struct StaticAuthenticator {
    tokens: HashMap<String, AuthenticatedUser>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token);
        if token.is_empty() {
            return Err(ApplicationError::unauthorized("missing token"));
        }
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ApplicationError::unauthorized("invalid token"))
    }
}
