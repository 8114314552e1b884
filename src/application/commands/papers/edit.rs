// src/application/commands/papers/edit.rs
use tracing::{debug, info};

use super::{PaperCommandService, capability::ensure_can_edit};
use crate::{
    application::{
        dto::{AuthenticatedUser, PaperDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        distribution::DistributionTargets,
        paper::{
            BloomLevel, ChoiceSet, ExamMetadata, PaperId, Part, PartId, Question, QuestionId,
            QuestionImage, UnitId,
        },
    },
};

pub struct UpdateMetadataCommand {
    pub paper_id: i64,
    pub metadata: ExamMetadata,
}

pub struct SetTargetsCommand {
    pub paper_id: i64,
    pub targets: DistributionTargets,
}

/// Adds a part, or replaces the part with the same id.
pub struct PutPartCommand {
    pub paper_id: i64,
    pub part: Part,
}

/// Derives a new configuration for an existing part from its current one.
pub struct ConfigurePartCommand<F> {
    pub paper_id: i64,
    pub part_id: String,
    pub edit: F,
}

pub struct AddQuestionCommand {
    pub paper_id: i64,
    pub part_id: String,
    pub text: String,
    pub unit: u8,
    pub bloom: BloomLevel,
    pub marks: u32,
    pub image: Option<QuestionImage>,
    pub choices: Option<(Vec<String>, usize)>,
}

pub struct UpdateQuestionCommand {
    pub paper_id: i64,
    pub question: Question,
}

pub struct RemoveQuestionCommand {
    pub paper_id: i64,
    pub question_id: i64,
}

impl PaperCommandService {
    pub async fn update_metadata(
        &self,
        actor: &AuthenticatedUser,
        command: UpdateMetadataCommand,
    ) -> ApplicationResult<PaperDto> {
        ensure_can_edit(actor)?;
        let id = PaperId::new(command.paper_id)?;
        let (paper, ()) = self
            .modify(id, |paper, now| Ok(paper.set_metadata(command.metadata, now)?))
            .await?;
        Ok(paper.into())
    }

    pub async fn set_targets(
        &self,
        actor: &AuthenticatedUser,
        command: SetTargetsCommand,
    ) -> ApplicationResult<PaperDto> {
        ensure_can_edit(actor)?;
        let id = PaperId::new(command.paper_id)?;
        let (paper, ()) = self
            .modify(id, |paper, now| Ok(paper.set_targets(command.targets, now)?))
            .await?;
        debug!(
            paper_id = %paper.id,
            valid = paper.configuration_report().is_valid,
            "distribution targets updated"
        );
        Ok(paper.into())
    }

    pub async fn put_part(
        &self,
        actor: &AuthenticatedUser,
        command: PutPartCommand,
    ) -> ApplicationResult<PaperDto> {
        ensure_can_edit(actor)?;
        let id = PaperId::new(command.paper_id)?;
        let (paper, ()) = self
            .modify(id, |paper, now| Ok(paper.put_part(command.part, now)?))
            .await?;
        Ok(paper.into())
    }

    /// The edit receives a copy of the stored part and returns its
    /// replacement; the part id cannot be changed this way.
    pub async fn configure_part<F>(
        &self,
        actor: &AuthenticatedUser,
        command: ConfigurePartCommand<F>,
    ) -> ApplicationResult<PaperDto>
    where
        F: FnOnce(Part) -> Part,
    {
        ensure_can_edit(actor)?;
        let id = PaperId::new(command.paper_id)?;
        let part_id = PartId::new(command.part_id)?;
        let edit = command.edit;
        let (paper, ()) = self
            .modify(id, |paper, now| {
                let current = paper
                    .part(&part_id)
                    .cloned()
                    .ok_or_else(|| ApplicationError::not_found(format!("part {part_id}")))?;
                let edited = edit(current);
                if edited.part_id != part_id {
                    return Err(ApplicationError::validation(
                        "configure_part cannot rename a part",
                    ));
                }
                Ok(paper.put_part(edited, now)?)
            })
            .await?;
        Ok(paper.into())
    }

    pub async fn add_question(
        &self,
        actor: &AuthenticatedUser,
        command: AddQuestionCommand,
    ) -> ApplicationResult<PaperDto> {
        ensure_can_edit(actor)?;
        let id = PaperId::new(command.paper_id)?;
        let part_id = PartId::new(command.part_id)?;
        let unit = UnitId::new(command.unit)?;
        let choices = command
            .choices
            .map(|(options, correct)| ChoiceSet::new(options, correct))
            .transpose()?;

        let (paper, question_id) = self
            .modify(id, |paper, now| {
                let question_id = QuestionId::new(paper.next_question_id())?;
                let mut question = Question::new(
                    question_id,
                    command.text,
                    part_id,
                    unit,
                    command.bloom,
                    command.marks,
                )?;
                question.image = command.image;
                question.choices = choices;
                paper.add_question(question, now)?;
                Ok(question_id)
            })
            .await?;
        info!(paper_id = %paper.id, %question_id, "question added");
        Ok(paper.into())
    }

    pub async fn update_question(
        &self,
        actor: &AuthenticatedUser,
        command: UpdateQuestionCommand,
    ) -> ApplicationResult<PaperDto> {
        ensure_can_edit(actor)?;
        let id = PaperId::new(command.paper_id)?;
        let question = command.question;
        if question.text.trim().is_empty() || question.marks == 0 {
            return Err(ApplicationError::validation(
                "question needs text and positive marks",
            ));
        }
        let (paper, ()) = self
            .modify(id, |paper, now| Ok(paper.update_question(question, now)?))
            .await?;
        Ok(paper.into())
    }

    pub async fn remove_question(
        &self,
        actor: &AuthenticatedUser,
        command: RemoveQuestionCommand,
    ) -> ApplicationResult<PaperDto> {
        ensure_can_edit(actor)?;
        let id = PaperId::new(command.paper_id)?;
        let question_id = QuestionId::new(command.question_id)?;
        let (paper, removed) = self
            .modify(id, |paper, now| Ok(paper.remove_question(question_id, now)?))
            .await?;
        info!(paper_id = %paper.id, question_id = %removed.id, "question removed");
        Ok(paper.into())
    }
}
