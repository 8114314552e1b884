// src/application/commands/papers/service.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::locks::PaperLocks;
use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        ports::ClockPort,
    },
    domain::{
        paper::{Paper, PaperId, PaperRepository},
        question_set::{FlatShuffle, SelectionStrategy},
    },
};

/// Switches that change how workflow guards are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowPolicy {
    /// Submit also requires a valid assembly report.
    pub enforce_distribution_on_submit: bool,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        Self {
            enforce_distribution_on_submit: true,
        }
    }
}

pub struct PaperCommandService {
    pub(super) repo: Arc<dyn PaperRepository>,
    pub(super) clock: Arc<ClockPort>,
    pub(super) policy: WorkflowPolicy,
    pub(super) strategy: Arc<dyn SelectionStrategy>,
    pub(super) locks: PaperLocks,
}

impl PaperCommandService {
    pub fn new(repo: Arc<dyn PaperRepository>, clock: Arc<ClockPort>) -> Self {
        Self {
            repo,
            clock,
            policy: WorkflowPolicy::default(),
            strategy: Arc::new(FlatShuffle),
            locks: PaperLocks::default(),
        }
    }

    pub fn with_policy(mut self, policy: WorkflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_selection_strategy(mut self, strategy: Arc<dyn SelectionStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn policy(&self) -> WorkflowPolicy {
        self.policy
    }

    pub(super) async fn load(&self, id: PaperId) -> ApplicationResult<Paper> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("paper {id} not found")))
    }

    /// Read-modify-write under the paper's lock. `apply` runs on a private
    /// copy; nothing is stored unless it succeeds.
    pub(super) async fn modify<T, F>(&self, id: PaperId, apply: F) -> ApplicationResult<(Paper, T)>
    where
        F: FnOnce(&mut Paper, DateTime<Utc>) -> ApplicationResult<T>,
    {
        let _guard = self.locks.acquire(id).await;
        let mut paper = self.load(id).await?;
        let outcome = apply(&mut paper, self.clock.now())?;
        let stored = self.repo.update(paper).await?;
        Ok((stored, outcome))
    }
}
