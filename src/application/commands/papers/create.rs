// src/application/commands/papers/create.rs
use tracing::info;

use super::{PaperCommandService, capability::ensure_capability};
use crate::{
    application::{
        dto::{AuthenticatedUser, PaperDto},
        error::ApplicationResult,
    },
    domain::{
        distribution::DistributionTargets,
        paper::{ExamMetadata, NewPaper, Part},
    },
};

pub struct CreatePaperCommand {
    pub metadata: ExamMetadata,
    pub targets: DistributionTargets,
    pub parts: Vec<Part>,
}

impl CreatePaperCommand {
    pub fn builder() -> CreatePaperCommandBuilder {
        CreatePaperCommandBuilder::default()
    }
}

#[derive(Default)]
pub struct CreatePaperCommandBuilder {
    metadata: Option<ExamMetadata>,
    targets: Option<DistributionTargets>,
    parts: Vec<Part>,
}

impl CreatePaperCommandBuilder {
    pub fn metadata(mut self, metadata: ExamMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn targets(mut self, targets: DistributionTargets) -> Self {
        self.targets = Some(targets);
        self
    }

    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn build(self) -> Result<CreatePaperCommand, &'static str> {
        Ok(CreatePaperCommand {
            metadata: self.metadata.ok_or("metadata is required")?,
            targets: self.targets.ok_or("targets are required")?,
            parts: self.parts,
        })
    }
}

impl PaperCommandService {
    pub async fn create_paper(
        &self,
        actor: &AuthenticatedUser,
        command: CreatePaperCommand,
    ) -> ApplicationResult<PaperDto> {
        ensure_capability(actor, "create")?;

        let CreatePaperCommand {
            metadata,
            targets,
            parts,
        } = command;
        let new_paper = NewPaper::new(metadata, targets, parts, actor.id, self.clock.now())?;
        let created = self.repo.insert(new_paper).await?;
        info!(paper_id = %created.id, actor = %actor.id, "paper created");
        Ok(created.into())
    }
}
