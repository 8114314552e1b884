// src/domain/paper/workflow.rs
use crate::domain::paper::value_objects::PartId;
use crate::domain::user::{Capability, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl PaperStatus {
    pub const ALL: [PaperStatus; 4] = [
        PaperStatus::Draft,
        PaperStatus::Submitted,
        PaperStatus::Approved,
        PaperStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaperStatus::Draft => "draft",
            PaperStatus::Submitted => "submitted",
            PaperStatus::Approved => "approved",
            PaperStatus::Rejected => "rejected",
        }
    }

    /// Questions and parts may only change in these states.
    pub fn is_editable(&self) -> bool {
        matches!(self, PaperStatus::Draft | PaperStatus::Rejected)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaperStatus::Approved)
    }

    /// The transition table. Guards that need the paper or the actor are
    /// checked by `Paper::transition`.
    pub fn next(self, event: WorkflowEvent) -> Result<PaperStatus, ViolationReason> {
        use PaperStatus::*;
        use WorkflowEvent::*;
        match (self, event) {
            (Draft, Submit) | (Rejected, Submit) => Ok(Submitted),
            (Submitted, Approve) => Ok(Approved),
            (Submitted, Reject) => Ok(Rejected),
            (Rejected, Reopen) => Ok(Draft),
            (Submitted, Submit) => Err(ViolationReason::AlreadySubmitted),
            (Approved, _) => Err(ViolationReason::Terminal),
            _ => Err(ViolationReason::NotAllowed),
        }
    }

    /// Events with a table entry from this state.
    pub fn allowed_events(self) -> Vec<WorkflowEvent> {
        WorkflowEvent::ALL
            .into_iter()
            .filter(|event| self.next(*event).is_ok())
            .collect()
    }
}

impl fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowEvent {
    Submit,
    Approve,
    Reject,
    /// Returns a rejected paper to draft.
    Reopen,
}

impl WorkflowEvent {
    pub const ALL: [WorkflowEvent; 4] = [
        WorkflowEvent::Submit,
        WorkflowEvent::Approve,
        WorkflowEvent::Reject,
        WorkflowEvent::Reopen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowEvent::Submit => "submit",
            WorkflowEvent::Approve => "approve",
            WorkflowEvent::Reject => "reject",
            WorkflowEvent::Reopen => "reopen",
        }
    }

    /// Capability action (on the `papers` resource) the actor must hold.
    pub fn required_action(&self) -> &'static str {
        match self {
            WorkflowEvent::Submit => "submit",
            WorkflowEvent::Approve | WorkflowEvent::Reject => "approve",
            WorkflowEvent::Reopen => "edit",
        }
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationReason {
    #[error("no questions in part {part_id}")]
    NoQuestionsInPart { part_id: PartId },
    #[error("paper has no enabled parts")]
    NoEnabledParts,
    #[error(
        "question distribution does not match the scheme ({actual_marks}/{target_marks} marks, {actual_questions}/{target_questions} questions)"
    )]
    DistributionMismatch {
        actual_marks: u32,
        target_marks: u32,
        actual_questions: u32,
        target_questions: u32,
    },
    #[error("missing capability {capability}")]
    MissingCapability { capability: Capability },
    #[error("a rejection requires a non-empty comment")]
    MissingComment,
    #[error("paper has already been submitted")]
    AlreadySubmitted,
    #[error("approved papers accept no further transitions")]
    Terminal,
    #[error("transition is not allowed")]
    NotAllowed,
}

/// An illegal transition attempt. The paper is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("cannot {event} a {status} paper: {reason}")]
pub struct WorkflowViolation {
    pub status: PaperStatus,
    pub event: WorkflowEvent,
    pub reason: ViolationReason,
}

/// One entry of a paper's audit trail. Records are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub status: PaperStatus,
    pub actor_id: UserId,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_lifecycle() {
        use PaperStatus::*;
        use WorkflowEvent::*;
        assert_eq!(Draft.allowed_events(), [Submit]);
        assert_eq!(Submitted.allowed_events(), [Approve, Reject]);
        assert_eq!(Rejected.allowed_events(), [Submit, Reopen]);
        assert!(Approved.allowed_events().is_empty());
    }

    #[test]
    fn resubmission_and_terminal_have_dedicated_reasons() {
        assert_eq!(
            PaperStatus::Submitted.next(WorkflowEvent::Submit),
            Err(ViolationReason::AlreadySubmitted)
        );
        for event in WorkflowEvent::ALL {
            assert_eq!(
                PaperStatus::Approved.next(event),
                Err(ViolationReason::Terminal)
            );
        }
    }

    #[test]
    fn violation_message_names_status_and_reason() {
        let violation = WorkflowViolation {
            status: PaperStatus::Draft,
            event: WorkflowEvent::Submit,
            reason: ViolationReason::NoQuestionsInPart {
                part_id: PartId::new("A").unwrap(),
            },
        };
        assert_eq!(
            violation.to_string(),
            "cannot submit a draft paper: no questions in part A"
        );
    }

    #[test]
    fn only_draft_and_rejected_are_editable() {
        let editable: Vec<_> = PaperStatus::ALL
            .into_iter()
            .filter(PaperStatus::is_editable)
            .collect();
        assert_eq!(editable, [PaperStatus::Draft, PaperStatus::Rejected]);
    }
}
