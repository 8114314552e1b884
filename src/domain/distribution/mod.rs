//! Question-distribution validation.
//!
//! `validate` checks a part configuration against the paper-wide mark and
//! question targets; `validate_assembly` checks the questions actually placed
//! on a paper against the same configuration. Both are pure and report every
//! mismatch as data.

mod report;

pub use report::{
    BloomTally, ConfigurationInconsistency, DistributionTargets, PartBreakdown,
    QuestionTotalSource, UnitTally, ValidationReport,
};

use crate::domain::paper::{BloomLevel, Part, UnitId};
use crate::domain::question_set::QuestionSet;

#[derive(Debug, Default, Clone, Copy)]
pub struct DistributionPlanner;

impl DistributionPlanner {
    /// Validates the configured scheme. Unit cells drive marks; the per-part
    /// question count comes from `targets.question_total_source`.
    pub fn validate(parts: &[Part], targets: &DistributionTargets) -> ValidationReport {
        let mut tallies = Tallies::default();
        let mut per_part = Vec::with_capacity(parts.len());
        let mut issues = Vec::new();

        for part in parts {
            if !part.enabled {
                per_part.push(PartBreakdown::disabled(part));
                continue;
            }
            let mpq = part.marks_per_question;
            let unit_questions = part.enabled_unit_questions();
            let bloom_questions = part.enabled_bloom_questions();
            let mut marks = MarkMath::default();

            for target in part.enabled_units() {
                let unit_marks = marks.mul(target.questions, mpq);
                tallies.add_unit(target.unit, target.questions, unit_marks);
            }
            for target in part.enabled_blooms() {
                let bloom_marks = marks.mul(target.questions, mpq);
                tallies.add_bloom(target.level, target.questions, bloom_marks);
            }
            let unit_marks = marks.mul(unit_questions, mpq);
            let bloom_marks = marks.mul(bloom_questions, mpq);
            if marks.overflowed {
                issues.push(ConfigurationInconsistency::PartMarksOverflow {
                    part_id: part.part_id.clone(),
                });
            }

            if unit_questions != part.target_question_count {
                issues.push(ConfigurationInconsistency::UnitSum {
                    part_id: part.part_id.clone(),
                    expected: part.target_question_count,
                    actual: unit_questions,
                });
            }
            if bloom_questions != part.target_question_count {
                issues.push(ConfigurationInconsistency::BloomSum {
                    part_id: part.part_id.clone(),
                    expected: part.target_question_count,
                    actual: bloom_questions,
                });
            }

            let counted_questions = match targets.question_total_source {
                QuestionTotalSource::Bloom => bloom_questions,
                QuestionTotalSource::Unit => unit_questions,
            };
            per_part.push(PartBreakdown {
                part_id: part.part_id.clone(),
                enabled: true,
                marks_per_question: mpq,
                target_questions: part.target_question_count,
                unit_questions,
                unit_marks,
                bloom_questions,
                bloom_marks,
                counted_questions,
                part_marks: unit_marks,
            });
        }

        finish(per_part, tallies, issues, targets)
    }

    /// Validates the questions placed on a paper. Actual marks are the sum of
    /// question marks and actual questions the number of counted questions.
    pub fn validate_assembly(
        parts: &[Part],
        questions: &QuestionSet,
        targets: &DistributionTargets,
    ) -> ValidationReport {
        let mut tallies = Tallies::default();
        let mut per_part = Vec::with_capacity(parts.len());
        let mut issues = Vec::new();

        for question in questions {
            match parts.iter().find(|p| p.part_id == question.part_id) {
                None => issues.push(ConfigurationInconsistency::UnknownPart {
                    question_id: question.id,
                    part_id: question.part_id.clone(),
                }),
                Some(part) if !part.enabled => {
                    issues.push(ConfigurationInconsistency::DisabledPart {
                        question_id: question.id,
                        part_id: question.part_id.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        for part in parts {
            if !part.enabled {
                per_part.push(PartBreakdown::disabled(part));
                continue;
            }
            let mpq = part.marks_per_question;
            let mut count = 0u32;
            let mut math = MarkMath::default();
            let mut marks = 0u32;

            for question in questions.by_part(&part.part_id) {
                count = count.saturating_add(1);
                marks = math.add(marks, question.marks);
                tallies.add_unit(question.unit, 1, question.marks);
                tallies.add_bloom(question.bloom, 1, question.marks);

                if question.marks != mpq {
                    issues.push(ConfigurationInconsistency::QuestionMarks {
                        question_id: question.id,
                        part_id: part.part_id.clone(),
                        expected: mpq,
                        actual: question.marks,
                    });
                }
                if !part.unit_enabled(question.unit) {
                    issues.push(ConfigurationInconsistency::DisabledUnit {
                        question_id: question.id,
                        unit: question.unit,
                    });
                }
                if !part.bloom_enabled(question.bloom) {
                    issues.push(ConfigurationInconsistency::DisabledBloom {
                        question_id: question.id,
                        level: question.bloom,
                    });
                }
            }

            for target in part.enabled_units() {
                let actual = questions
                    .by_part(&part.part_id)
                    .filter(|q| q.unit == target.unit)
                    .count() as u32;
                if actual != target.questions {
                    issues.push(ConfigurationInconsistency::UnitCell {
                        part_id: part.part_id.clone(),
                        unit: target.unit,
                        expected: target.questions,
                        actual,
                    });
                }
            }
            for target in part.enabled_blooms() {
                let actual = questions
                    .by_part(&part.part_id)
                    .filter(|q| q.bloom == target.level)
                    .count() as u32;
                if actual != target.questions {
                    issues.push(ConfigurationInconsistency::BloomCell {
                        part_id: part.part_id.clone(),
                        level: target.level,
                        expected: target.questions,
                        actual,
                    });
                }
            }

            if math.overflowed {
                issues.push(ConfigurationInconsistency::PartMarksOverflow {
                    part_id: part.part_id.clone(),
                });
            }

            per_part.push(PartBreakdown {
                part_id: part.part_id.clone(),
                enabled: true,
                marks_per_question: mpq,
                target_questions: part.target_question_count,
                unit_questions: count,
                unit_marks: marks,
                bloom_questions: count,
                bloom_marks: marks,
                counted_questions: count,
                part_marks: marks,
            });
        }

        finish(per_part, tallies, issues, targets)
    }
}

impl PartBreakdown {
    fn disabled(part: &Part) -> Self {
        Self {
            part_id: part.part_id.clone(),
            enabled: false,
            marks_per_question: part.marks_per_question,
            target_questions: part.target_question_count,
            unit_questions: 0,
            unit_marks: 0,
            bloom_questions: 0,
            bloom_marks: 0,
            counted_questions: 0,
            part_marks: 0,
        }
    }
}

/// Mark arithmetic that saturates instead of wrapping and remembers that it
/// had to.
#[derive(Default)]
struct MarkMath {
    overflowed: bool,
}

impl MarkMath {
    fn mul(&mut self, questions: u32, marks_per_question: u32) -> u32 {
        self.checked(questions.checked_mul(marks_per_question))
    }

    fn add(&mut self, a: u32, b: u32) -> u32 {
        self.checked(a.checked_add(b))
    }

    fn checked(&mut self, value: Option<u32>) -> u32 {
        value.unwrap_or_else(|| {
            self.overflowed = true;
            u32::MAX
        })
    }
}

#[derive(Default)]
struct Tallies {
    units: Vec<UnitTally>,
    blooms: Vec<BloomTally>,
}

impl Tallies {
    fn add_unit(&mut self, unit: UnitId, questions: u32, marks: u32) {
        match self.units.iter_mut().find(|t| t.unit == unit) {
            Some(tally) => {
                tally.questions = tally.questions.saturating_add(questions);
                tally.marks = tally.marks.saturating_add(marks);
            }
            None => self.units.push(UnitTally {
                unit,
                questions,
                marks,
            }),
        }
    }

    fn add_bloom(&mut self, level: BloomLevel, questions: u32, marks: u32) {
        match self.blooms.iter_mut().find(|t| t.level == level) {
            Some(tally) => {
                tally.questions = tally.questions.saturating_add(questions);
                tally.marks = tally.marks.saturating_add(marks);
            }
            None => self.blooms.push(BloomTally {
                level,
                questions,
                marks,
            }),
        }
    }
}

fn finish(
    per_part: Vec<PartBreakdown>,
    mut tallies: Tallies,
    mut issues: Vec<ConfigurationInconsistency>,
    targets: &DistributionTargets,
) -> ValidationReport {
    let mut totals = MarkMath::default();
    let actual_marks = per_part
        .iter()
        .fold(0, |acc, p| totals.add(acc, p.part_marks));
    let actual_questions = per_part
        .iter()
        .fold(0, |acc, p| totals.add(acc, p.counted_questions));
    if totals.overflowed {
        issues.push(ConfigurationInconsistency::TotalsOverflow);
    }
    let overflowed = issues.iter().any(ConfigurationInconsistency::is_overflow);

    if actual_marks != targets.total_marks {
        issues.push(ConfigurationInconsistency::TotalMarks {
            expected: targets.total_marks,
            actual: actual_marks,
        });
    }
    if actual_questions != targets.total_questions {
        issues.push(ConfigurationInconsistency::TotalQuestions {
            expected: targets.total_questions,
            actual: actual_questions,
        });
    }

    tallies.units.sort_by_key(|t| t.unit);
    tallies.blooms.sort_by_key(|t| t.level);

    ValidationReport {
        is_valid: !overflowed
            && actual_marks == targets.total_marks
            && actual_questions == targets.total_questions,
        actual_marks,
        actual_questions,
        target_marks: targets.total_marks,
        target_questions: targets.total_questions,
        question_total_source: targets.question_total_source,
        per_part,
        per_unit: tallies.units,
        per_bloom: tallies.blooms,
        issues,
    }
}
