// src/application/commands/papers/randomize.rs
use tracing::info;

use super::{PaperCommandService, capability::ensure_can_edit};
use crate::{
    application::{
        dto::{AuthenticatedUser, RandomizedPartDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        paper::{PaperId, PartId, Question, QuestionId},
        question_set::{ShuffleRng, fresh_seed},
    },
};

/// Replaces a part's questions with a draw from `pool`.
pub struct RandomizePartCommand {
    pub paper_id: i64,
    pub part_id: String,
    pub pool: Vec<Question>,
    /// Defaults to the part's target question count.
    pub target_count: Option<usize>,
    /// Fixed seed for a reproducible draw; a fresh one is used otherwise.
    pub seed: Option<u64>,
}

impl PaperCommandService {
    pub async fn randomize_part(
        &self,
        actor: &AuthenticatedUser,
        command: RandomizePartCommand,
    ) -> ApplicationResult<RandomizedPartDto> {
        ensure_can_edit(actor)?;
        let id = PaperId::new(command.paper_id)?;
        let part_id = PartId::new(command.part_id)?;
        let seed = command.seed.unwrap_or_else(fresh_seed);
        let strategy = self.strategy.name();
        let pool = command.pool;
        let requested = command.target_count;

        let (paper, selected) = self
            .modify(id, |paper, now| {
                let part = paper
                    .part(&part_id)
                    .ok_or_else(|| ApplicationError::not_found(format!("part {part_id}")))?;
                let target = requested.unwrap_or(part.target_question_count as usize);

                let mut rng = ShuffleRng::new(seed);
                let drawn = self.strategy.select(&pool, target, &mut rng);

                // Drawn questions join the part under fresh ids so they cannot
                // clash with questions kept in other parts.
                let first_id = paper.next_question_id();
                let replacement = drawn
                    .into_iter()
                    .enumerate()
                    .map(|(offset, mut question)| -> ApplicationResult<Question> {
                        question.id = QuestionId::new(first_id + offset as i64)?;
                        Ok(question.in_part(part_id.clone()))
                    })
                    .collect::<ApplicationResult<Vec<_>>>()?;
                let selected = replacement.len();
                paper.replace_part_questions(&part_id, replacement, now)?;
                Ok(selected)
            })
            .await?;

        info!(
            paper_id = %paper.id,
            part = %part_id,
            selected,
            pool = pool.len(),
            seed,
            strategy,
            "part randomised"
        );
        Ok(RandomizedPartDto {
            paper: paper.into(),
            part_id: part_id.to_string(),
            selected,
            seed,
            strategy,
        })
    }
}
