// src/domain/paper/question.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::paper::value_objects::{BloomLevel, PartId, QuestionId, UnitId};
use serde::{Deserialize, Serialize};

/// Where the bytes of an attached figure come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Url(String),
    /// Base64 payload, optionally wrapped in a `data:` URI.
    Embedded(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionImage {
    pub source: ImageSource,
    /// Declared intrinsic size in points; zero means unknown.
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl QuestionImage {
    pub fn url(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: ImageSource::Url(url.into()),
            width,
            height,
        }
    }

    pub fn embedded(data: impl Into<String>) -> Self {
        Self {
            source: ImageSource::Embedded(data.into()),
            width: 0,
            height: 0,
        }
    }

    /// Short reference printed in place of the image in text outputs.
    pub fn reference(&self) -> String {
        match &self.source {
            ImageSource::Url(url) => url.clone(),
            ImageSource::Embedded(data) => format!("embedded:{}", data.len()),
        }
    }
}

/// Multiple-choice options. The correct answer is stored as an index that is
/// re-pointed whenever the options are reordered, so it always follows the
/// option's value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawChoiceSet")]
pub struct ChoiceSet {
    options: Vec<String>,
    correct: usize,
}

#[derive(Deserialize)]
struct RawChoiceSet {
    options: Vec<String>,
    correct: usize,
}

impl TryFrom<RawChoiceSet> for ChoiceSet {
    type Error = DomainError;

    fn try_from(raw: RawChoiceSet) -> Result<Self, Self::Error> {
        Self::new(raw.options, raw.correct)
    }
}

impl ChoiceSet {
    pub fn new(options: Vec<String>, correct: usize) -> DomainResult<Self> {
        if options.len() < 2 {
            return Err(DomainError::Validation(
                "a choice question needs at least two options".into(),
            ));
        }
        if correct >= options.len() {
            return Err(DomainError::Validation(format!(
                "correct option {correct} is out of range for {} options",
                options.len()
            )));
        }
        Ok(Self { options, correct })
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct
    }

    pub fn correct_value(&self) -> &str {
        &self.options[self.correct]
    }

    /// Reorders options according to `order` (a permutation of indices) and
    /// re-points the correct answer to the new position of its value.
    pub(crate) fn reorder(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.options.len());
        let reordered: Vec<String> = order.iter().map(|&i| self.options[i].clone()).collect();
        self.correct = order
            .iter()
            .position(|&i| i == self.correct)
            .unwrap_or(self.correct);
        self.options = reordered;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// Rich text; may carry inline markup such as `<b>` or `<sub>`.
    pub text: String,
    pub part_id: PartId,
    pub unit: UnitId,
    pub bloom: BloomLevel,
    pub marks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<QuestionImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<ChoiceSet>,
}

impl Question {
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        part_id: PartId,
        unit: UnitId,
        bloom: BloomLevel,
        marks: u32,
    ) -> DomainResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::Validation("question text cannot be empty".into()));
        }
        if marks == 0 {
            return Err(DomainError::Validation("question marks must be positive".into()));
        }
        Ok(Self {
            id,
            text,
            part_id,
            unit,
            bloom,
            marks,
            image: None,
            choices: None,
        })
    }

    pub fn with_image(mut self, image: QuestionImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_choices(mut self, choices: ChoiceSet) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn in_part(mut self, part_id: PartId) -> Self {
        self.part_id = part_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> ChoiceSet {
        ChoiceSet::new(vec!["red".into(), "green".into(), "blue".into()], 1).unwrap()
    }

    #[test]
    fn reorder_tracks_correct_value() {
        let mut set = choices();
        set.reorder(&[2, 0, 1]);
        assert_eq!(set.options(), ["blue", "red", "green"]);
        assert_eq!(set.correct_value(), "green");
        assert_eq!(set.correct_index(), 2);
    }

    #[test]
    fn deserialising_checks_the_correct_index() {
        let err = serde_json::from_str::<ChoiceSet>(r#"{"options":["a","b"],"correct":5}"#)
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(serde_json::from_str::<ChoiceSet>(r#"{"options":["a"],"correct":0}"#).is_err());

        let json = serde_json::to_string(&choices()).unwrap();
        let back: ChoiceSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.correct_value(), "green");
    }

    #[test]
    fn choice_set_rejects_out_of_range_answer() {
        assert!(ChoiceSet::new(vec!["a".into(), "b".into()], 2).is_err());
        assert!(ChoiceSet::new(vec!["a".into()], 0).is_err());
    }

    #[test]
    fn question_requires_text_and_marks() {
        let part = PartId::new("A").unwrap();
        let unit = UnitId::new(1).unwrap();
        let id = QuestionId::new(1).unwrap();
        assert!(Question::new(id, " ", part.clone(), unit, BloomLevel::Apply, 2).is_err());
        assert!(Question::new(id, "Define entropy.", part, unit, BloomLevel::Apply, 0).is_err());
    }
}
