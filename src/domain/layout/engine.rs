// src/domain/layout/engine.rs
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::layout::geometry::{LayoutError, PageGeometry};
use crate::domain::layout::image::{DeclaredDimensions, ImageResolutionError, ImageResolver};
use crate::domain::layout::measure::{HeuristicMeasurer, TextMeasurer};
use crate::domain::paper::{Paper, Part, PartId, Question, QuestionId, QuestionImage};
use crate::domain::question_set::QuestionSet;

const FIT_TOLERANCE: f32 = 1e-3;

/// Spacing and image policy for the pagination engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Vertical gap between consecutive blocks on a page.
    pub block_gap: f32,
    /// Images never exceed this fraction of the page height.
    pub max_image_height_ratio: f32,
    /// Height reserved for an image that could not be resolved.
    pub image_placeholder_height: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            block_gap: 8.0,
            max_image_height_ratio: 0.4,
            image_placeholder_height: 48.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    PartTitle,
    Instructions,
    Question,
    Image,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::PartTitle => "part_title",
            BlockKind::Instructions => "instructions",
            BlockKind::Question => "question",
            BlockKind::Image => "image",
        }
    }

    pub fn is_part_header(&self) -> bool {
        matches!(self, BlockKind::PartTitle | BlockKind::Instructions)
    }
}

/// Smallest unsplittable unit of placed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub part_id: PartId,
    pub source_question_id: Option<QuestionId>,
    /// Printed question number, consecutive across the paper.
    pub number: Option<u32>,
    /// Text for text blocks; the image reference for image blocks.
    pub content: String,
    pub height_estimate: f32,
    /// Offset from the top of the page's content area.
    pub top: f32,
    /// The image could not be resolved and a placeholder height was used.
    pub degraded: bool,
    /// Runs past the bottom of the usable area. Only happens when a
    /// keep-together chain is taller than an empty page.
    pub overflow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based.
    pub index: u32,
    pub usable_height: f32,
    pub used_height: f32,
    pub blocks: Vec<Block>,
}

impl Page {
    fn new(index: u32, usable_height: f32) -> Self {
        Self {
            index,
            usable_height,
            used_height: 0.0,
            blocks: Vec::new(),
        }
    }

    pub fn remaining(&self) -> f32 {
        (self.usable_height - self.used_height).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Lays out a paper's questions onto fixed-size pages.
///
/// Layout is pure: identical inputs produce identical pages. A question and
/// its image are kept on one page, and a part header always shares its page
/// with the part's first question.
#[derive(Clone)]
pub struct PaginationEngine {
    settings: LayoutSettings,
    measurer: Arc<dyn TextMeasurer>,
    resolver: Arc<dyn ImageResolver>,
}

impl std::fmt::Debug for PaginationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationEngine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for PaginationEngine {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

impl PaginationEngine {
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            settings,
            measurer: Arc::new(HeuristicMeasurer::default()),
            resolver: Arc::new(DeclaredDimensions),
        }
    }

    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn with_image_resolver(mut self, resolver: Arc<dyn ImageResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn layout_paper(&self, paper: &Paper, geometry: &PageGeometry) -> Result<Vec<Page>, LayoutError> {
        self.layout(paper.parts(), paper.questions(), geometry)
    }

    /// Walks enabled parts in declared order and their questions in set
    /// order. Questions of unknown or disabled parts are not laid out.
    pub fn layout(
        &self,
        parts: &[Part],
        questions: &QuestionSet,
        geometry: &PageGeometry,
    ) -> Result<Vec<Page>, LayoutError> {
        geometry.validate()?;

        let mut cursor = PageCursor::new(geometry, &self.settings);
        let mut number = 0u32;

        for part in parts.iter().filter(|p| p.enabled) {
            let mut part_questions = questions.by_part(&part.part_id);
            let Some(first) = part_questions.next() else {
                debug!(part = %part.part_id, "part has no questions; header omitted");
                continue;
            };

            number += 1;
            let mut chain = self.header_blocks(part, geometry);
            chain.extend(self.question_blocks(first, number, geometry));
            cursor.place_chain(chain);

            for question in part_questions {
                number += 1;
                cursor.place_chain(self.question_blocks(question, number, geometry));
            }
        }

        let skipped = (questions.len() as u32).saturating_sub(number);
        if skipped > 0 {
            debug!(skipped, "questions outside enabled parts were not laid out");
        }

        let pages = cursor.finish();
        debug!(pages = pages.len(), questions = number, "layout complete");
        Ok(pages)
    }

    fn header_blocks(&self, part: &Part, geometry: &PageGeometry) -> Vec<Block> {
        let width = geometry.content_width();
        let mut blocks = vec![Block {
            kind: BlockKind::PartTitle,
            part_id: part.part_id.clone(),
            source_question_id: None,
            number: None,
            content: part.title.clone(),
            height_estimate: self.measurer.measure(&part.title, width),
            top: 0.0,
            degraded: false,
            overflow: false,
        }];

        let lines: Vec<&str> = [
            part.instructions.selection_rule.as_str(),
            part.instructions.marks_formula.as_str(),
        ]
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
        if !lines.is_empty() {
            let content = lines.join("\n");
            blocks.push(Block {
                kind: BlockKind::Instructions,
                part_id: part.part_id.clone(),
                source_question_id: None,
                number: None,
                height_estimate: self.measurer.measure(&content, width),
                content,
                top: 0.0,
                degraded: false,
                overflow: false,
            });
        }
        blocks
    }

    fn question_blocks(&self, question: &Question, number: u32, geometry: &PageGeometry) -> Vec<Block> {
        let content = question_content(question);
        let measured = format!("{number}. {content} ({} marks)", question.marks);
        let mut blocks = vec![Block {
            kind: BlockKind::Question,
            part_id: question.part_id.clone(),
            source_question_id: Some(question.id),
            number: Some(number),
            height_estimate: self.measurer.measure(&measured, geometry.content_width()),
            content,
            top: 0.0,
            degraded: false,
            overflow: false,
        }];

        if let Some(image) = &question.image {
            let (height_estimate, degraded) = match self.image_height(image, geometry) {
                Ok(height) => (height, false),
                Err(err) => {
                    warn!(
                        question_id = %question.id,
                        error = %err,
                        "image could not be resolved; using placeholder"
                    );
                    (
                        self.settings
                            .image_placeholder_height
                            .min(geometry.usable_height()),
                        true,
                    )
                }
            };
            blocks.push(Block {
                kind: BlockKind::Image,
                part_id: question.part_id.clone(),
                source_question_id: Some(question.id),
                number: None,
                content: image.reference(),
                height_estimate,
                top: 0.0,
                degraded,
                overflow: false,
            });
        }
        blocks
    }

    /// Scales to the content width (never up), preserving aspect ratio, then
    /// caps the height.
    fn image_height(&self, image: &QuestionImage, geometry: &PageGeometry) -> Result<f32, ImageResolutionError> {
        let dims = self.resolver.resolve(image)?;
        if dims.width == 0 || dims.height == 0 {
            return Err(ImageResolutionError::Empty);
        }
        let scale = (geometry.content_width() / dims.width as f32).min(1.0);
        let cap = (geometry.page_height * self.settings.max_image_height_ratio)
            .min(geometry.usable_height());
        Ok((dims.height as f32 * scale).min(cap))
    }
}

fn question_content(question: &Question) -> String {
    let mut content = question.text.clone();
    if let Some(choices) = &question.choices {
        for (index, option) in choices.options().iter().enumerate() {
            content.push('\n');
            content.push_str(&format!("({}) {option}", option_label(index)));
        }
    }
    content
}

fn option_label(index: usize) -> String {
    if index < 26 {
        char::from(b'a' + index as u8).to_string()
    } else {
        (index + 1).to_string()
    }
}

struct PageCursor<'g> {
    geometry: &'g PageGeometry,
    gap: f32,
    /// Images in an oversized chain are not shrunk below this height.
    min_image_height: f32,
    pages: Vec<Page>,
    current: Page,
}

impl<'g> PageCursor<'g> {
    fn new(geometry: &'g PageGeometry, settings: &LayoutSettings) -> Self {
        Self {
            geometry,
            gap: settings.block_gap,
            min_image_height: settings.image_placeholder_height,
            pages: Vec::new(),
            current: Page::new(1, geometry.usable_height_of(1)),
        }
    }

    fn needed(&self, chain: &[Block]) -> f32 {
        let heights: f32 = chain.iter().map(|b| b.height_estimate).sum();
        let inner_gaps = self.gap * chain.len().saturating_sub(1) as f32;
        let leading_gap = if self.current.is_empty() { 0.0 } else { self.gap };
        heights + inner_gaps + leading_gap
    }

    fn fits(&self, chain: &[Block]) -> bool {
        self.current.used_height + self.needed(chain)
            <= self.current.usable_height + FIT_TOLERANCE
    }

    /// Places blocks that must share a page. A chain that does not fit the
    /// current page starts a new one. A chain taller than an empty page first
    /// has its images shrunk; whatever still does not fit is placed anyway
    /// and the blocks running past the bottom are flagged `overflow`.
    fn place_chain(&mut self, mut chain: Vec<Block>) {
        if chain.is_empty() {
            return;
        }
        if !self.fits(&chain) && !self.current.is_empty() {
            self.break_page();
        }
        if !self.fits(&chain) {
            self.shrink_images(&mut chain);
        }
        for block in chain {
            self.push(block);
        }
    }

    fn shrink_images(&self, chain: &mut [Block]) {
        let mut excess = self.current.used_height + self.needed(chain) - self.current.usable_height;
        for block in chain.iter_mut().filter(|b| b.kind == BlockKind::Image) {
            if excess <= 0.0 {
                break;
            }
            let floor = self.min_image_height.min(block.height_estimate);
            let cut = (block.height_estimate - floor).min(excess).max(0.0);
            block.height_estimate -= cut;
            excess -= cut;
        }
    }

    fn push(&mut self, mut block: Block) {
        let top = if self.current.is_empty() {
            0.0
        } else {
            self.current.used_height + self.gap
        };
        block.top = top;
        block.overflow = top + block.height_estimate > self.current.usable_height + FIT_TOLERANCE;
        self.current.used_height = top + block.height_estimate;
        self.current.blocks.push(block);
    }

    fn break_page(&mut self) {
        let index = self.current.index + 1;
        let next = Page::new(index, self.geometry.usable_height_of(index));
        let done = std::mem::replace(&mut self.current, next);
        self.pages.push(done);
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}
