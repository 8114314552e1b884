//! Ordered, part-partitioned collection of a paper's questions.
//!
//! Filtering helpers return borrowing iterators over the underlying vector;
//! nothing is copied. Once finalised the set rejects every mutation.

pub mod rng;
pub mod selection;

pub use rng::{ShuffleRng, fresh_seed};
pub use selection::{FlatShuffle, SelectionStrategy, randomize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::paper::{BloomLevel, PartId, Question, QuestionId, UnitId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionSet {
    questions: Vec<Question>,
    #[serde(default)]
    finalized: bool,
}

impl QuestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_questions(questions: Vec<Question>) -> DomainResult<Self> {
        let mut set = Self::new();
        for question in questions {
            set.push(question)?;
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn by_part<'a>(&'a self, part: &'a PartId) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions.iter().filter(move |q| &q.part_id == part)
    }

    pub fn by_unit(&self, unit: UnitId) -> impl Iterator<Item = &Question> + '_ {
        self.questions.iter().filter(move |q| q.unit == unit)
    }

    pub fn by_bloom(&self, level: BloomLevel) -> impl Iterator<Item = &Question> + '_ {
        self.questions.iter().filter(move |q| q.bloom == level)
    }

    pub fn by_marks(&self, marks: u32) -> impl Iterator<Item = &Question> + '_ {
        self.questions.iter().filter(move |q| q.marks == marks)
    }

    pub fn count_in_part(&self, part: &PartId) -> usize {
        self.by_part(part).count()
    }

    /// Smallest id greater than every id in the set.
    pub fn next_id(&self) -> i64 {
        self.questions
            .iter()
            .map(|q| i64::from(q.id))
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn push(&mut self, question: Question) -> DomainResult<()> {
        self.ensure_open()?;
        if self.get(question.id).is_some() {
            return Err(DomainError::Conflict(format!(
                "question {} already exists",
                question.id
            )));
        }
        self.questions.push(question);
        Ok(())
    }

    /// Replaces the question with the same id, keeping its position.
    pub fn replace(&mut self, question: Question) -> DomainResult<()> {
        self.ensure_open()?;
        let slot = self
            .questions
            .iter_mut()
            .find(|q| q.id == question.id)
            .ok_or_else(|| DomainError::NotFound(format!("question {}", question.id)))?;
        *slot = question;
        Ok(())
    }

    pub fn remove(&mut self, id: QuestionId) -> DomainResult<Question> {
        self.ensure_open()?;
        let index = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("question {id}")))?;
        Ok(self.questions.remove(index))
    }

    /// Swaps every question of `part` for `replacement`, which is inserted
    /// where the part's first question used to be (or appended).
    pub fn replace_part(&mut self, part: &PartId, replacement: Vec<Question>) -> DomainResult<()> {
        self.ensure_open()?;
        if let Some(stray) = replacement.iter().find(|q| &q.part_id != part) {
            return Err(DomainError::Validation(format!(
                "question {} belongs to part {}, not {part}",
                stray.id, stray.part_id
            )));
        }
        // Everything before the part's first question belongs to other parts.
        let insert_at = self
            .questions
            .iter()
            .position(|q| &q.part_id == part)
            .unwrap_or(self.questions.len());
        let mut kept: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| &q.part_id != part)
            .cloned()
            .collect();
        for (index, question) in replacement.iter().enumerate() {
            let clashes = kept.iter().any(|q| q.id == question.id)
                || replacement[..index].iter().any(|q| q.id == question.id);
            if clashes {
                return Err(DomainError::Conflict(format!(
                    "question {} already exists",
                    question.id
                )));
            }
        }
        kept.splice(insert_at..insert_at, replacement);
        self.questions = kept;
        Ok(())
    }

    pub(crate) fn finalize(&mut self) {
        self.finalized = true;
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if self.finalized {
            Err(DomainError::Conflict("question set is finalized".into()))
        } else {
            Ok(())
        }
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, part: &str, unit: u8, bloom: BloomLevel, marks: u32) -> Question {
        Question::new(
            QuestionId::new(id).unwrap(),
            format!("Question {id}"),
            PartId::new(part).unwrap(),
            UnitId::new(unit).unwrap(),
            bloom,
            marks,
        )
        .unwrap()
    }

    fn sample() -> QuestionSet {
        QuestionSet::from_questions(vec![
            question(1, "A", 1, BloomLevel::Remember, 2),
            question(2, "A", 2, BloomLevel::Apply, 2),
            question(3, "B", 1, BloomLevel::Apply, 13),
            question(4, "B", 3, BloomLevel::Evaluate, 13),
        ])
        .unwrap()
    }

    #[test]
    fn views_filter_in_order() {
        let set = sample();
        let part_b = PartId::new("B").unwrap();
        let ids: Vec<i64> = set.by_part(&part_b).map(|q| i64::from(q.id)).collect();
        assert_eq!(ids, [3, 4]);
        assert_eq!(set.by_unit(UnitId::new(1).unwrap()).count(), 2);
        assert_eq!(set.by_bloom(BloomLevel::Apply).count(), 2);
        assert_eq!(set.by_marks(13).count(), 2);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut set = sample();
        let err = set.push(question(2, "A", 1, BloomLevel::Remember, 2));
        assert!(matches!(err, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn finalized_set_rejects_mutation() {
        let mut set = sample();
        set.finalize();
        assert!(set.push(question(9, "A", 1, BloomLevel::Remember, 2)).is_err());
        assert!(set.remove(QuestionId::new(1).unwrap()).is_err());
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn replace_part_keeps_part_position() {
        let mut set = sample();
        let part_a = PartId::new("A").unwrap();
        set.replace_part(
            &part_a,
            vec![
                question(10, "A", 4, BloomLevel::Understand, 2),
                question(11, "A", 5, BloomLevel::Understand, 2),
                question(12, "A", 5, BloomLevel::Remember, 2),
            ],
        )
        .unwrap();
        let ids: Vec<i64> = set.iter().map(|q| i64::from(q.id)).collect();
        assert_eq!(ids, [10, 11, 12, 3, 4]);
    }

    #[test]
    fn replace_part_rejects_foreign_questions() {
        let mut set = sample();
        let part_a = PartId::new("A").unwrap();
        let err = set.replace_part(&part_a, vec![question(10, "B", 1, BloomLevel::Apply, 13)]);
        assert!(matches!(err, Err(DomainError::Validation(_))));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn next_id_follows_maximum() {
        assert_eq!(sample().next_id(), 5);
        assert_eq!(QuestionSet::new().next_id(), 1);
    }
}
