// src/domain/question_set/selection.rs
use crate::domain::paper::Question;
use crate::domain::question_set::rng::ShuffleRng;

/// Chooses which pool questions make it onto a paper.
///
/// Implementations must be deterministic for a given rng state.
pub trait SelectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn select(&self, pool: &[Question], target_count: usize, rng: &mut ShuffleRng)
    -> Vec<Question>;
}

/// Unweighted shuffle over the whole pool, ignoring part/unit/bloom tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatShuffle;

impl SelectionStrategy for FlatShuffle {
    fn name(&self) -> &'static str {
        "flat-shuffle"
    }

    fn select(
        &self,
        pool: &[Question],
        target_count: usize,
        rng: &mut ShuffleRng,
    ) -> Vec<Question> {
        let take = target_count.min(pool.len());
        let order = rng.permutation(pool.len());
        order
            .into_iter()
            .take(take)
            .map(|index| {
                let mut question = pool[index].clone();
                if let Some(choices) = question.choices.as_mut() {
                    let option_order = rng.permutation(choices.options().len());
                    choices.reorder(&option_order);
                }
                question
            })
            .collect()
    }
}

/// Selects `min(target_count, pool.len())` questions with the default strategy.
pub fn randomize(pool: &[Question], target_count: usize, rng: &mut ShuffleRng) -> Vec<Question> {
    FlatShuffle.select(pool, target_count, rng)
}
