use crate::domain::user::{Capability, Role, UserId};
use std::collections::HashSet;

/// Acting identity supplied by the authentication collaborator.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub capabilities: HashSet<Capability>,
}

impl AuthenticatedUser {
    /// An identity carrying the default capabilities of `role`.
    pub fn with_role(id: UserId, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            capabilities: role.default_capabilities(),
        }
    }

    pub fn has_capability(&self, resource: &str, action: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(resource, action))
    }
}
