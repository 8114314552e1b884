// src/domain/user/value_objects.rs
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

pub const PAPERS: &str = "papers";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("user id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    pub resource: String,
    pub action: String,
}

impl Capability {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn matches(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && self.action == action
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// Staff role as supplied by the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Approver,
    #[default]
    Drafter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Approver => "approver",
            Role::Drafter => "drafter",
        }
    }

    pub fn default_capabilities(&self) -> HashSet<Capability> {
        use Capability as Cap;
        match self {
            Role::Admin => HashSet::from([
                Cap::new(PAPERS, "create"),
                Cap::new(PAPERS, "edit"),
                Cap::new(PAPERS, "submit"),
                Cap::new(PAPERS, "approve"),
                Cap::new(PAPERS, "delete"),
                Cap::new(PAPERS, "read"),
            ]),
            Role::Approver => HashSet::from([
                Cap::new(PAPERS, "approve"),
                Cap::new(PAPERS, "read"),
            ]),
            Role::Drafter => HashSet::from([
                Cap::new(PAPERS, "create"),
                Cap::new(PAPERS, "edit"),
                Cap::new(PAPERS, "submit"),
                Cap::new(PAPERS, "delete"),
                Cap::new(PAPERS, "read"),
            ]),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "approver" => Ok(Role::Approver),
            "drafter" => Ok(Role::Drafter),
            other => Err(DomainError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approver_cannot_edit() {
        let caps = Role::Approver.default_capabilities();
        assert!(caps.iter().any(|c| c.matches(PAPERS, "approve")));
        assert!(!caps.iter().any(|c| c.matches(PAPERS, "edit")));
    }

    #[test]
    fn drafter_cannot_approve() {
        let caps = Role::Drafter.default_capabilities();
        assert!(!caps.iter().any(|c| c.matches(PAPERS, "approve")));
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Approver, Role::Drafter] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("author".parse::<Role>().is_err());
    }

    #[test]
    fn user_id_must_be_positive() {
        assert!(UserId::new(0).is_err());
        assert_eq!(i64::from(UserId::new(7).unwrap()), 7);
    }
}
