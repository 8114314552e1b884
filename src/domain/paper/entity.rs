// src/domain/paper/entity.rs
use std::collections::HashSet;

use crate::domain::distribution::{DistributionPlanner, DistributionTargets, ValidationReport};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::paper::part::Part;
use crate::domain::paper::question::Question;
use crate::domain::paper::specifications::CanTriggerEventSpec;
use crate::domain::paper::value_objects::{PaperId, PartId, QuestionId};
use crate::domain::paper::workflow::{
    ApprovalRecord, PaperStatus, ViolationReason, WorkflowEvent, WorkflowViolation,
};
use crate::domain::question_set::QuestionSet;
use crate::domain::user::{Capability, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExamMetadata {
    pub institution: String,
    pub course: String,
    pub semester: String,
    pub subject_code: String,
    pub subject_name: String,
    pub max_marks: u32,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
}

impl ExamMetadata {
    pub fn validate(&self) -> DomainResult<()> {
        if self.subject_code.trim().is_empty() {
            return Err(DomainError::Validation("subject code cannot be empty".into()));
        }
        if self.max_marks == 0 {
            return Err(DomainError::Validation("max marks must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewPaper {
    pub metadata: ExamMetadata,
    pub targets: DistributionTargets,
    pub parts: Vec<Part>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl NewPaper {
    pub fn new(
        metadata: ExamMetadata,
        targets: DistributionTargets,
        parts: Vec<Part>,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        metadata.validate()?;
        ensure_unique_parts(&parts)?;
        Ok(Self {
            metadata,
            targets,
            parts,
            created_by,
            created_at,
        })
    }
}

/// Everything `Paper::transition` needs to know about the attempt.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRequest<'a> {
    pub event: WorkflowEvent,
    pub actor_id: UserId,
    pub capabilities: &'a HashSet<Capability>,
    pub comment: Option<&'a str>,
    pub at: DateTime<Utc>,
    /// Refuse submission while the assembled questions miss the targets.
    pub enforce_distribution: bool,
}

/// Aggregate root. Owns its parts, questions and approval history; the
/// history only grows through `transition`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: PaperId,
    pub metadata: ExamMetadata,
    targets: DistributionTargets,
    parts: Vec<Part>,
    #[serde(default)]
    questions: QuestionSet,
    #[serde(default)]
    status: PaperStatus,
    #[serde(default)]
    approval_history: Vec<ApprovalRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    review_comment: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency token; bumped by the repository on every write.
    #[serde(default)]
    pub version: u64,
}

impl Paper {
    pub fn from_new(id: PaperId, new: NewPaper) -> Self {
        Self {
            id,
            metadata: new.metadata,
            targets: new.targets,
            parts: new.parts,
            questions: QuestionSet::new(),
            status: PaperStatus::Draft,
            approval_history: Vec::new(),
            review_comment: None,
            created_by: new.created_by,
            created_at: new.created_at,
            updated_at: new.created_at,
            version: 0,
        }
    }

    pub fn status(&self) -> PaperStatus {
        self.status
    }

    pub fn targets(&self) -> &DistributionTargets {
        &self.targets
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, part_id: &PartId) -> Option<&Part> {
        self.parts.iter().find(|p| &p.part_id == part_id)
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn approval_history(&self) -> &[ApprovalRecord] {
        &self.approval_history
    }

    pub fn review_comment(&self) -> Option<&str> {
        self.review_comment.as_deref()
    }

    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    pub fn configuration_report(&self) -> ValidationReport {
        DistributionPlanner::validate(&self.parts, &self.targets)
    }

    pub fn assembly_report(&self) -> ValidationReport {
        DistributionPlanner::validate_assembly(&self.parts, &self.questions, &self.targets)
    }

    pub fn set_metadata(&mut self, metadata: ExamMetadata, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_editable()?;
        metadata.validate()?;
        self.metadata = metadata;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_targets(&mut self, targets: DistributionTargets, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_editable()?;
        self.targets = targets;
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the part with the same id, or appends a new part.
    pub fn put_part(&mut self, part: Part, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_editable()?;
        match self.parts.iter_mut().find(|p| p.part_id == part.part_id) {
            Some(slot) => *slot = part,
            None => self.parts.push(part),
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn add_question(&mut self, question: Question, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_editable()?;
        self.ensure_part_exists(&question.part_id)?;
        self.questions.push(question)?;
        self.updated_at = now;
        Ok(())
    }

    pub fn update_question(&mut self, question: Question, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_editable()?;
        self.ensure_part_exists(&question.part_id)?;
        self.questions.replace(question)?;
        self.updated_at = now;
        Ok(())
    }

    pub fn remove_question(&mut self, id: QuestionId, now: DateTime<Utc>) -> DomainResult<Question> {
        self.ensure_editable()?;
        let removed = self.questions.remove(id)?;
        self.updated_at = now;
        Ok(removed)
    }

    pub fn replace_part_questions(
        &mut self,
        part_id: &PartId,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_editable()?;
        self.ensure_part_exists(part_id)?;
        self.questions.replace_part(part_id, questions)?;
        self.updated_at = now;
        Ok(())
    }

    pub fn next_question_id(&self) -> i64 {
        self.questions.next_id()
    }

    /// Applies a workflow event. On success returns the updated paper with the
    /// new status and exactly one appended record; on failure `self` is
    /// unchanged and the violation names the failing guard.
    pub fn transition(&self, request: TransitionRequest<'_>) -> Result<Paper, WorkflowViolation> {
        let violation = |reason| WorkflowViolation {
            status: self.status,
            event: request.event,
            reason,
        };

        let next_status = self.status.next(request.event).map_err(violation)?;

        let spec = CanTriggerEventSpec::new(request.capabilities, request.event);
        if !spec.is_satisfied() {
            return Err(violation(ViolationReason::MissingCapability {
                capability: spec.required(),
            }));
        }

        let comment = request
            .comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        match request.event {
            WorkflowEvent::Submit => {
                self.check_submittable(request.enforce_distribution)
                    .map_err(violation)?;
            }
            WorkflowEvent::Reject if comment.is_none() => {
                return Err(violation(ViolationReason::MissingComment));
            }
            _ => {}
        }

        let mut next = self.clone();
        next.status = next_status;
        match request.event {
            WorkflowEvent::Submit => next.review_comment = None,
            WorkflowEvent::Reject => next.review_comment = comment.clone(),
            WorkflowEvent::Approve => next.questions.finalize(),
            WorkflowEvent::Reopen => {}
        }

        // Records stay ordered by timestamp even if the clock steps back.
        let timestamp = self
            .approval_history
            .last()
            .map(|last| last.timestamp.max(request.at))
            .unwrap_or(request.at);
        next.approval_history.push(ApprovalRecord {
            status: next_status,
            actor_id: request.actor_id,
            timestamp,
            comments: comment,
        });
        next.updated_at = timestamp;
        Ok(next)
    }

    fn check_submittable(&self, enforce_distribution: bool) -> Result<(), ViolationReason> {
        let mut enabled = self.parts.iter().filter(|p| p.enabled).peekable();
        if enabled.peek().is_none() {
            return Err(ViolationReason::NoEnabledParts);
        }
        if let Some(empty) = enabled.find(|p| self.questions.count_in_part(&p.part_id) == 0) {
            return Err(ViolationReason::NoQuestionsInPart {
                part_id: empty.part_id.clone(),
            });
        }
        if enforce_distribution {
            let report = self.assembly_report();
            if !report.is_valid {
                return Err(ViolationReason::DistributionMismatch {
                    actual_marks: report.actual_marks,
                    target_marks: report.target_marks,
                    actual_questions: report.actual_questions,
                    target_questions: report.target_questions,
                });
            }
        }
        Ok(())
    }

    fn ensure_editable(&self) -> DomainResult<()> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(DomainError::NotEditable(self.status))
        }
    }

    fn ensure_part_exists(&self, part_id: &PartId) -> DomainResult<()> {
        if self.part(part_id).is_some() {
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("part {part_id}")))
        }
    }
}

fn ensure_unique_parts(parts: &[Part]) -> DomainResult<()> {
    for (index, part) in parts.iter().enumerate() {
        if parts[..index].iter().any(|p| p.part_id == part.part_id) {
            return Err(DomainError::Conflict(format!(
                "part {} is declared twice",
                part.part_id
            )));
        }
    }
    Ok(())
}
