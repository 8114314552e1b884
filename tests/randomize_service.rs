mod support;

use qpaper_core::application::{
    ApplicationError, commands::papers::RandomizePartCommand, dto::RandomizedPartDto,
};
use qpaper_core::domain::errors::DomainError;
use qpaper_core::domain::paper::{BloomLevel, ChoiceSet, PaperStatus, Question};
use support::*;

fn pool() -> Vec<Question> {
    let mut pool: Vec<Question> = (0..12)
        .map(|i| question(100 + i, "A", (i % 5) as u8 + 1, BloomLevel::Understand, 2))
        .collect();
    pool[3] = pool[3].clone().with_choices(
        ChoiceSet::new(
            vec!["B-tree".into(), "Hash".into(), "Bitmap".into(), "R-tree".into()],
            2,
        )
        .unwrap(),
    );
    pool
}

fn command(paper_id: i64, seed: u64) -> RandomizePartCommand {
    RandomizePartCommand {
        paper_id,
        part_id: "A".into(),
        pool: pool(),
        target_count: None,
        seed: Some(seed),
    }
}

#[tokio::test]
async fn same_seed_draws_the_same_questions() {
    let h = harness();
    let first = h.commands.create_paper(&drafter(), create_command()).await.unwrap();
    let second = h.commands.create_paper(&drafter(), create_command()).await.unwrap();

    let a = h.commands.randomize_part(&drafter(), command(first.id, 42)).await.unwrap();
    let b = h.commands.randomize_part(&drafter(), command(second.id, 42)).await.unwrap();

    assert_eq!(a.seed, 42);
    assert_eq!(a.selected, 5);
    assert_eq!(a.strategy, "flat-shuffle");
    let texts = |dto: &RandomizedPartDto| {
        dto.paper
            .questions
            .iter()
            .map(|q| q.text.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(texts(&a), texts(&b));
}

#[tokio::test]
async fn drawn_questions_get_fresh_ids_in_the_part() {
    let h = harness();
    let paper = h.assembled_paper().await;

    let drawn = h
        .commands
        .randomize_part(&drafter(), command(paper.id, 7))
        .await
        .unwrap();

    let ids: Vec<i64> = drawn.paper.questions.iter().map(|q| q.id.into()).collect();
    assert_eq!(ids, [6, 7, 8, 9, 10]);
    assert!(drawn.paper.questions.iter().all(|q| q.part_id.as_str() == "A"));
}

#[tokio::test]
async fn shuffled_choices_keep_their_correct_answer() {
    let h = harness();
    let paper = h.commands.create_paper(&drafter(), create_command()).await.unwrap();

    for seed in 1..20 {
        let drawn = h
            .commands
            .randomize_part(
                &drafter(),
                RandomizePartCommand {
                    target_count: Some(12),
                    ..command(paper.id, seed)
                },
            )
            .await
            .unwrap();
        let mcq = drawn
            .paper
            .questions
            .iter()
            .find_map(|q| q.choices.as_ref())
            .expect("choice question drawn");
        assert_eq!(mcq.correct_value(), "Bitmap");
        assert_eq!(mcq.options().len(), 4);
    }
}

#[tokio::test]
async fn short_pool_fills_what_it_can() {
    let h = harness();
    let paper = h.commands.create_paper(&drafter(), create_command()).await.unwrap();

    let drawn = h
        .commands
        .randomize_part(
            &drafter(),
            RandomizePartCommand {
                pool: pool().into_iter().take(3).collect(),
                ..command(paper.id, 9)
            },
        )
        .await
        .unwrap();
    assert_eq!(drawn.selected, 3);
    assert_eq!(drawn.paper.questions.len(), 3);
}

#[tokio::test]
async fn approved_papers_cannot_be_redrawn() {
    let h = harness();
    let paper = h.assembled_paper().await;
    h.commands.submit(&drafter(), paper.id).await.unwrap();
    h.commands.approve(&approver(), paper.id, None).await.unwrap();

    let err = h
        .commands
        .randomize_part(&drafter(), command(paper.id, 3))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotEditable(PaperStatus::Approved))
    ));
}
