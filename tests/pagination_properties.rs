//! Properties of the pagination engine over generated question sets.

mod support;

use proptest::prelude::*;

use qpaper_core::domain::layout::{BlockKind, Page, fingerprint};
use qpaper_core::domain::paper::{BloomLevel, Part, Question, QuestionImage};
use qpaper_core::domain::question_set::QuestionSet;
use support::*;

const EPSILON: f32 = 1e-3;

fn parts() -> Vec<Part> {
    vec![
        Part::new(part_id("A"), "PART A", 2, 0)
            .unwrap()
            .with_instructions("Answer ALL questions", "Each question carries 2 marks"),
        Part::new(part_id("B"), "PART B", 13, 0).unwrap(),
    ]
}

type Spec = (bool, usize, Option<u32>);

/// (in part B, text length, image height) per question. Every chain fits
/// an empty 120pt page.
fn question_specs() -> impl Strategy<Value = Vec<Spec>> {
    proptest::collection::vec(
        (any::<bool>(), 1usize..80, proptest::option::of(1u32..400)),
        0..30,
    )
}

/// Long enough text that headers, questions and images can outgrow a page.
fn tall_question_specs() -> impl Strategy<Value = Vec<Spec>> {
    proptest::collection::vec(
        (any::<bool>(), 1usize..600, proptest::option::of(1u32..400)),
        0..20,
    )
}

fn assert_keep_together(pages: &[Page]) -> Result<(), TestCaseError> {
    for (page, i) in blocks(pages) {
        let block = &page.blocks[i];
        if block.kind.is_part_header() {
            let next = page.blocks[i + 1..].iter().find(|b| !b.kind.is_part_header());
            prop_assert!(
                next.is_some_and(|b| b.kind == BlockKind::Question),
                "header on page {} has no question after it",
                page.index
            );
        }
        if block.kind == BlockKind::Image {
            prop_assert!(i > 0);
            let previous = &page.blocks[i - 1];
            prop_assert_eq!(previous.kind, BlockKind::Question);
            prop_assert_eq!(previous.source_question_id, block.source_question_id);
        }
    }
    Ok(())
}

fn build(specs: &[Spec]) -> QuestionSet {
    let questions: Vec<Question> = specs
        .iter()
        .enumerate()
        .map(|(i, &(in_b, len, image))| {
            let (part, marks) = if in_b { ("B", 13) } else { ("A", 2) };
            let mut q = question(i as i64 + 1, part, 1, BloomLevel::Understand, marks);
            q.text = "x".repeat(len);
            if let Some(height) = image {
                q = q.with_image(QuestionImage::url(format!("fig{i}.png"), 200, height));
            }
            q
        })
        .collect();
    QuestionSet::from_questions(questions).unwrap()
}

fn blocks(pages: &[Page]) -> impl Iterator<Item = (&Page, usize)> {
    pages
        .iter()
        .flat_map(|page| (0..page.blocks.len()).map(move |i| (page, i)))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// Same input, same pages, same fingerprint.
    #[test]
    fn layout_is_deterministic(specs in question_specs()) {
        let set = build(&specs);
        let engine = small_engine();
        let first = engine.layout(&parts(), &set, &small_geometry()).unwrap();
        let second = engine.layout(&parts(), &set, &small_geometry()).unwrap();
        prop_assert_eq!(fingerprint(&first), fingerprint(&second));
        prop_assert_eq!(first, second);
    }

    /// Blocks sit inside their page and pages are numbered from 1.
    #[test]
    fn blocks_fit_their_page(specs in question_specs()) {
        let pages = small_engine()
            .layout(&parts(), &build(&specs), &small_geometry())
            .unwrap();
        prop_assert!(!pages.is_empty());
        for (position, page) in pages.iter().enumerate() {
            prop_assert_eq!(page.index as usize, position + 1);
            prop_assert!(page.used_height <= page.usable_height + EPSILON);
            for block in &page.blocks {
                prop_assert!(!block.overflow);
                prop_assert!(block.top >= 0.0);
                prop_assert!(block.top + block.height_estimate <= page.usable_height + EPSILON);
            }
        }
    }

    /// Part headers never end a page, and images stay with their question.
    #[test]
    fn headers_and_images_keep_company(specs in question_specs()) {
        let pages = small_engine()
            .layout(&parts(), &build(&specs), &small_geometry())
            .unwrap();
        assert_keep_together(&pages)?;
    }

    /// Chains taller than a page still stay together.
    #[test]
    fn tall_chains_keep_company(specs in tall_question_specs()) {
        let pages = small_engine()
            .layout(&parts(), &build(&specs), &small_geometry())
            .unwrap();
        assert_keep_together(&pages)?;
    }

    /// Only blocks flagged `overflow` run past the page, and an overflowing
    /// chain always starts on a fresh page.
    #[test]
    fn overflow_is_flagged_and_starts_its_page(specs in tall_question_specs()) {
        let pages = small_engine()
            .layout(&parts(), &build(&specs), &small_geometry())
            .unwrap();
        for page in &pages {
            for (i, block) in page.blocks.iter().enumerate() {
                let bottom = block.top + block.height_estimate;
                prop_assert_eq!(block.overflow, bottom > page.usable_height + EPSILON);
                if block.overflow {
                    let only_same_chain_before = page.blocks[..i].iter().all(|earlier| {
                        earlier.kind.is_part_header()
                            || earlier.source_question_id == block.source_question_id
                    });
                    prop_assert!(only_same_chain_before);
                }
            }
        }
    }

    /// Every question appears once, numbered 1..=n in reading order.
    #[test]
    fn numbering_is_consecutive(specs in tall_question_specs()) {
        let pages = small_engine()
            .layout(&parts(), &build(&specs), &small_geometry())
            .unwrap();
        let numbers: Vec<u32> = pages
            .iter()
            .flat_map(|page| page.blocks.iter())
            .filter(|b| b.kind == BlockKind::Question)
            .filter_map(|b| b.number)
            .collect();
        let expected: Vec<u32> = (1..=specs.len() as u32).collect();
        prop_assert_eq!(numbers, expected);
    }
}
