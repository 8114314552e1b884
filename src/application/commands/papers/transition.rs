// src/application/commands/papers/transition.rs
use tracing::{info, warn};

use super::PaperCommandService;
use crate::{
    application::{
        dto::{AuthenticatedUser, PaperDto},
        error::ApplicationResult,
    },
    domain::paper::{PaperId, TransitionRequest, WorkflowEvent},
};

pub struct TransitionCommand {
    pub paper_id: i64,
    pub event: WorkflowEvent,
    pub comment: Option<String>,
}

impl TransitionCommand {
    pub fn new(paper_id: i64, event: WorkflowEvent) -> Self {
        Self {
            paper_id,
            event,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl PaperCommandService {
    /// Applies a workflow event. The status change and its approval record
    /// are stored together; concurrent transitions on one paper are
    /// serialised, so of two racing submits only one succeeds.
    pub async fn transition(
        &self,
        actor: &AuthenticatedUser,
        command: TransitionCommand,
    ) -> ApplicationResult<PaperDto> {
        let id = PaperId::new(command.paper_id)?;
        let event = command.event;
        let enforce_distribution = self.policy.enforce_distribution_on_submit;

        let result = self
            .modify(id, |paper, now| {
                let request = TransitionRequest {
                    event,
                    actor_id: actor.id,
                    capabilities: &actor.capabilities,
                    comment: command.comment.as_deref(),
                    at: now,
                    enforce_distribution,
                };
                let from = paper.status();
                *paper = paper.transition(request)?;
                Ok(from)
            })
            .await;

        match result {
            Ok((paper, from)) => {
                info!(
                    paper_id = %paper.id,
                    actor = %actor.id,
                    event = event.as_str(),
                    from = from.as_str(),
                    status = paper.status().as_str(),
                    "paper transitioned"
                );
                Ok(paper.into())
            }
            Err(err) => {
                if let Some(violation) = err.as_workflow_violation() {
                    warn!(
                        paper_id = %id,
                        actor = %actor.id,
                        event = event.as_str(),
                        status = violation.status.as_str(),
                        reason = %violation.reason,
                        "workflow violation"
                    );
                }
                Err(err)
            }
        }
    }

    pub async fn submit(&self, actor: &AuthenticatedUser, paper_id: i64) -> ApplicationResult<PaperDto> {
        self.transition(actor, TransitionCommand::new(paper_id, WorkflowEvent::Submit))
            .await
    }

    pub async fn approve(
        &self,
        actor: &AuthenticatedUser,
        paper_id: i64,
        comment: Option<String>,
    ) -> ApplicationResult<PaperDto> {
        let mut command = TransitionCommand::new(paper_id, WorkflowEvent::Approve);
        command.comment = comment;
        self.transition(actor, command).await
    }

    pub async fn reject(
        &self,
        actor: &AuthenticatedUser,
        paper_id: i64,
        comment: impl Into<String>,
    ) -> ApplicationResult<PaperDto> {
        self.transition(
            actor,
            TransitionCommand::new(paper_id, WorkflowEvent::Reject).with_comment(comment),
        )
        .await
    }

    pub async fn reopen(&self, actor: &AuthenticatedUser, paper_id: i64) -> ApplicationResult<PaperDto> {
        self.transition(actor, TransitionCommand::new(paper_id, WorkflowEvent::Reopen))
            .await
    }
}
