// src/domain/distribution/report.rs
use crate::domain::paper::{BloomLevel, PartId, QuestionId, UnitId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which per-part count feeds the grand question total.
///
/// Bloom-level counts are authoritative by default; unit counts only drive
/// marks. The alternative is kept selectable so the asymmetry stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionTotalSource {
    #[default]
    Bloom,
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistributionTargets {
    pub total_marks: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub question_total_source: QuestionTotalSource,
}

impl DistributionTargets {
    pub fn new(total_marks: u32, total_questions: u32) -> Self {
        Self {
            total_marks,
            total_questions,
            question_total_source: QuestionTotalSource::default(),
        }
    }

    pub fn with_source(mut self, source: QuestionTotalSource) -> Self {
        self.question_total_source = source;
        self
    }
}

/// A mismatch between the configured scheme and what was found. Reported as
/// data; it never aborts validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigurationInconsistency {
    #[error("total marks {actual} do not match target {expected}")]
    TotalMarks { expected: u32, actual: u32 },
    #[error("total questions {actual} do not match target {expected}")]
    TotalQuestions { expected: u32, actual: u32 },
    #[error("part {part_id}: unit counts sum to {actual}, expected {expected}")]
    UnitSum {
        part_id: PartId,
        expected: u32,
        actual: u32,
    },
    #[error("part {part_id}: bloom counts sum to {actual}, expected {expected}")]
    BloomSum {
        part_id: PartId,
        expected: u32,
        actual: u32,
    },
    #[error("part {part_id}: {unit} has {actual} questions, expected {expected}")]
    UnitCell {
        part_id: PartId,
        unit: UnitId,
        expected: u32,
        actual: u32,
    },
    #[error("part {part_id}: level {level} has {actual} questions, expected {expected}")]
    BloomCell {
        part_id: PartId,
        level: BloomLevel,
        expected: u32,
        actual: u32,
    },
    #[error("question {question_id} carries {actual} marks, part {part_id} expects {expected}")]
    QuestionMarks {
        question_id: QuestionId,
        part_id: PartId,
        expected: u32,
        actual: u32,
    },
    #[error("question {question_id} references unknown part {part_id}")]
    UnknownPart {
        question_id: QuestionId,
        part_id: PartId,
    },
    #[error("question {question_id} sits in disabled part {part_id}")]
    DisabledPart {
        question_id: QuestionId,
        part_id: PartId,
    },
    #[error("question {question_id} is tagged with disabled {unit}")]
    DisabledUnit { question_id: QuestionId, unit: UnitId },
    #[error("question {question_id} is tagged with disabled level {level}")]
    DisabledBloom {
        question_id: QuestionId,
        level: BloomLevel,
    },
    #[error("part {part_id}: marks exceed the supported range")]
    PartMarksOverflow { part_id: PartId },
    #[error("paper totals exceed the supported range")]
    TotalsOverflow,
}

impl ConfigurationInconsistency {
    /// Overflow makes the affected totals meaningless, so it always
    /// invalidates a report.
    pub fn is_overflow(&self) -> bool {
        matches!(
            self,
            Self::PartMarksOverflow { .. } | Self::TotalsOverflow
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartBreakdown {
    pub part_id: PartId,
    pub enabled: bool,
    pub marks_per_question: u32,
    pub target_questions: u32,
    pub unit_questions: u32,
    pub unit_marks: u32,
    pub bloom_questions: u32,
    pub bloom_marks: u32,
    /// Questions counted toward the grand total, per the total source.
    pub counted_questions: u32,
    pub part_marks: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTally {
    pub unit: UnitId,
    pub questions: u32,
    pub marks: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomTally {
    pub level: BloomLevel,
    pub questions: u32,
    pub marks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub actual_marks: u32,
    pub actual_questions: u32,
    pub target_marks: u32,
    pub target_questions: u32,
    pub question_total_source: QuestionTotalSource,
    pub per_part: Vec<PartBreakdown>,
    pub per_unit: Vec<UnitTally>,
    pub per_bloom: Vec<BloomTally>,
    pub issues: Vec<ConfigurationInconsistency>,
}

impl ValidationReport {
    pub fn part(&self, part_id: &PartId) -> Option<&PartBreakdown> {
        self.per_part.iter().find(|p| &p.part_id == part_id)
    }

    pub fn unit(&self, unit: UnitId) -> Option<&UnitTally> {
        self.per_unit.iter().find(|t| t.unit == unit)
    }

    pub fn bloom(&self, level: BloomLevel) -> Option<&BloomTally> {
        self.per_bloom.iter().find(|t| t.level == level)
    }
}
