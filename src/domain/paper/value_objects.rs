// src/domain/paper/value_objects.rs
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PaperId(i64);

impl PaperId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("paper id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<PaperId> for i64 {
    fn from(value: PaperId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for PaperId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct QuestionId(i64);

impl QuestionId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("question id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<QuestionId> for i64 {
    fn from(value: QuestionId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for QuestionId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Section label of a paper, e.g. `A`, `B`, `C`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartId(String);

impl PartId {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("part id cannot be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PartId> for String {
    fn from(value: PartId) -> Self {
        value.0
    }
}

impl TryFrom<String> for PartId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 1-based syllabus unit number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct UnitId(u8);

impl UnitId {
    pub fn new(unit: u8) -> DomainResult<Self> {
        if unit == 0 {
            Err(DomainError::Validation("unit numbers start at 1".into()))
        } else {
            Ok(Self(unit))
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }
}

impl From<UnitId> for u8 {
    fn from(value: UnitId) -> Self {
        value.0
    }
}

impl TryFrom<u8> for UnitId {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {}", self.0)
    }
}

/// Cognitive level of Bloom's taxonomy, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloomLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl BloomLevel {
    pub const ALL: [BloomLevel; 6] = [
        BloomLevel::Remember,
        BloomLevel::Understand,
        BloomLevel::Apply,
        BloomLevel::Analyze,
        BloomLevel::Evaluate,
        BloomLevel::Create,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloomLevel::Remember => "remember",
            BloomLevel::Understand => "understand",
            BloomLevel::Apply => "apply",
            BloomLevel::Analyze => "analyze",
            BloomLevel::Evaluate => "evaluate",
            BloomLevel::Create => "create",
        }
    }

    /// Conventional `K1`..`K6` code.
    pub fn code(&self) -> &'static str {
        match self {
            BloomLevel::Remember => "K1",
            BloomLevel::Understand => "K2",
            BloomLevel::Apply => "K3",
            BloomLevel::Analyze => "K4",
            BloomLevel::Evaluate => "K5",
            BloomLevel::Create => "K6",
        }
    }
}

impl fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloomLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        BloomLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == lower || level.code().eq_ignore_ascii_case(&lower))
            .ok_or_else(|| DomainError::Validation(format!("unknown bloom level '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_id_is_trimmed_and_non_empty() {
        assert_eq!(PartId::new(" A ").unwrap().as_str(), "A");
        assert!(PartId::new("   ").is_err());
    }

    #[test]
    fn unit_zero_is_rejected() {
        assert!(UnitId::new(0).is_err());
        assert_eq!(UnitId::new(3).unwrap().number(), 3);
    }

    #[test]
    fn bloom_level_parses_names_and_codes() {
        assert_eq!("Apply".parse::<BloomLevel>().unwrap(), BloomLevel::Apply);
        assert_eq!("k5".parse::<BloomLevel>().unwrap(), BloomLevel::Evaluate);
        assert!("memorise".parse::<BloomLevel>().is_err());
    }

    #[test]
    fn ids_deserialize_through_validation() {
        let ok: PaperId = serde_json::from_str("12").unwrap();
        assert_eq!(i64::from(ok), 12);
        assert!(serde_json::from_str::<PaperId>("-1").is_err());
    }
}
