use crate::domain::distribution::DistributionTargets;
use crate::domain::paper::{ApprovalRecord, ExamMetadata, Paper, PaperStatus, Part, Question};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperDto {
    pub id: i64,
    pub metadata: ExamMetadata,
    pub targets: DistributionTargets,
    pub parts: Vec<Part>,
    pub questions: Vec<Question>,
    pub questions_finalized: bool,
    pub status: PaperStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comment: Option<String>,
    pub approval_history: Vec<ApprovalRecordDto>,
    pub allowed_events: Vec<String>,
    pub version: u64,
    pub created_by: i64,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub updated_at: DateTime<Utc>,
}

impl From<Paper> for PaperDto {
    fn from(paper: Paper) -> Self {
        Self {
            id: paper.id.into(),
            targets: *paper.targets(),
            parts: paper.parts().to_vec(),
            questions: paper.questions().as_slice().to_vec(),
            questions_finalized: paper.questions().is_finalized(),
            status: paper.status(),
            review_comment: paper.review_comment().map(str::to_string),
            approval_history: paper
                .approval_history()
                .iter()
                .cloned()
                .map(ApprovalRecordDto::from)
                .collect(),
            allowed_events: paper
                .status()
                .allowed_events()
                .into_iter()
                .map(|event| event.as_str().to_string())
                .collect(),
            version: paper.version,
            created_by: paper.created_by.into(),
            created_at: paper.created_at,
            updated_at: paper.updated_at,
            metadata: paper.metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecordDto {
    pub status: PaperStatus,
    pub actor_id: i64,
    #[serde(with = "serde_time")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl From<ApprovalRecord> for ApprovalRecordDto {
    fn from(record: ApprovalRecord) -> Self {
        Self {
            status: record.status,
            actor_id: record.actor_id.into(),
            timestamp: record.timestamp,
            comments: record.comments,
        }
    }
}

/// Outcome of drawing a part's questions from a pool.
#[derive(Debug, Clone, Serialize)]
pub struct RandomizedPartDto {
    pub paper: PaperDto,
    pub part_id: String,
    pub selected: usize,
    /// Re-running with this seed and the same pool reproduces the selection.
    pub seed: u64,
    pub strategy: &'static str,
}
