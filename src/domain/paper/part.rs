// src/domain/paper/part.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::paper::value_objects::{BloomLevel, PartId, UnitId};
use serde::{Deserialize, Serialize};

/// The two instruction lines printed under a part title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PartInstructions {
    /// e.g. "Answer ALL questions".
    pub selection_rule: String,
    /// e.g. "10 x 2 = 20 marks".
    pub marks_formula: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitTarget {
    pub unit: UnitId,
    pub questions: u32,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BloomTarget {
    pub level: BloomLevel,
    pub questions: u32,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Distribution scheme for one section of a paper.
///
/// Parts are values: every edit returns a new `Part` and leaves the original
/// untouched. Disabled cells keep their counts so re-enabling restores them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Part {
    pub part_id: PartId,
    pub title: String,
    #[serde(default)]
    pub instructions: PartInstructions,
    pub marks_per_question: u32,
    pub target_question_count: u32,
    pub unit_targets: Vec<UnitTarget>,
    pub bloom_targets: Vec<BloomTarget>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl Part {
    pub fn new(
        part_id: PartId,
        title: impl Into<String>,
        marks_per_question: u32,
        target_question_count: u32,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::Validation("part title cannot be empty".into()));
        }
        if marks_per_question == 0 {
            return Err(DomainError::Validation(
                "marks per question must be positive".into(),
            ));
        }
        Ok(Self {
            part_id,
            title,
            instructions: PartInstructions::default(),
            marks_per_question,
            target_question_count,
            unit_targets: Vec::new(),
            bloom_targets: Vec::new(),
            enabled: true,
        })
    }

    pub fn with_instructions(
        mut self,
        selection_rule: impl Into<String>,
        marks_formula: impl Into<String>,
    ) -> Self {
        self.instructions = PartInstructions {
            selection_rule: selection_rule.into(),
            marks_formula: marks_formula.into(),
        };
        self
    }

    /// Sets (or inserts) the question count for `unit`.
    pub fn with_unit_count(mut self, unit: UnitId, questions: u32) -> Self {
        match self.unit_targets.iter_mut().find(|t| t.unit == unit) {
            Some(target) => target.questions = questions,
            None => {
                self.unit_targets.push(UnitTarget {
                    unit,
                    questions,
                    enabled: true,
                });
                self.unit_targets.sort_by_key(|t| t.unit);
            }
        }
        self
    }

    pub fn with_unit_enabled(mut self, unit: UnitId, enabled: bool) -> Self {
        if let Some(target) = self.unit_targets.iter_mut().find(|t| t.unit == unit) {
            target.enabled = enabled;
        }
        self
    }

    /// Sets (or inserts) the question count for `level`.
    pub fn with_bloom_count(mut self, level: BloomLevel, questions: u32) -> Self {
        match self.bloom_targets.iter_mut().find(|t| t.level == level) {
            Some(target) => target.questions = questions,
            None => {
                self.bloom_targets.push(BloomTarget {
                    level,
                    questions,
                    enabled: true,
                });
                self.bloom_targets.sort_by_key(|t| t.level);
            }
        }
        self
    }

    pub fn with_bloom_enabled(mut self, level: BloomLevel, enabled: bool) -> Self {
        if let Some(target) = self.bloom_targets.iter_mut().find(|t| t.level == level) {
            target.enabled = enabled;
        }
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn enabled_units(&self) -> impl Iterator<Item = &UnitTarget> + '_ {
        self.unit_targets.iter().filter(|t| t.enabled)
    }

    pub fn enabled_blooms(&self) -> impl Iterator<Item = &BloomTarget> + '_ {
        self.bloom_targets.iter().filter(|t| t.enabled)
    }

    pub fn unit_enabled(&self, unit: UnitId) -> bool {
        self.unit_targets
            .iter()
            .any(|t| t.unit == unit && t.enabled)
    }

    pub fn bloom_enabled(&self, level: BloomLevel) -> bool {
        self.bloom_targets
            .iter()
            .any(|t| t.level == level && t.enabled)
    }

    pub fn enabled_unit_questions(&self) -> u32 {
        self.enabled_units().map(|t| t.questions).fold(0u32, u32::saturating_add)
    }

    pub fn enabled_bloom_questions(&self) -> u32 {
        self.enabled_blooms().map(|t| t.questions).fold(0u32, u32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(n: u8) -> UnitId {
        UnitId::new(n).unwrap()
    }

    fn part_a() -> Part {
        Part::new(PartId::new("A").unwrap(), "Part A", 2, 5)
            .unwrap()
            .with_unit_count(unit(1), 1)
            .with_unit_count(unit(2), 1)
            .with_unit_count(unit(3), 3)
            .with_bloom_count(BloomLevel::Remember, 5)
    }

    #[test]
    fn toggling_a_unit_keeps_its_count() {
        let part = part_a();
        let disabled = part.clone().with_unit_enabled(unit(3), false);
        assert_eq!(disabled.enabled_unit_questions(), 2);
        assert_eq!(part.enabled_unit_questions(), 5);

        let restored = disabled.with_unit_enabled(unit(3), true);
        assert_eq!(restored, part);
    }

    #[test]
    fn edits_are_independent_per_cell() {
        let part = part_a().with_unit_count(unit(1), 4);
        assert_eq!(part.unit_targets[0].questions, 4);
        assert_eq!(part.unit_targets[1].questions, 1);
        assert_eq!(part.enabled_bloom_questions(), 5);
    }

    #[test]
    fn new_cells_are_kept_sorted() {
        let part = part_a()
            .with_bloom_count(BloomLevel::Create, 1)
            .with_bloom_count(BloomLevel::Apply, 1);
        let levels: Vec<_> = part.bloom_targets.iter().map(|t| t.level).collect();
        assert_eq!(
            levels,
            [BloomLevel::Remember, BloomLevel::Apply, BloomLevel::Create]
        );
    }
}
