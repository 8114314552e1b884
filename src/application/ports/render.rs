// src/application/ports/render.rs
use crate::application::{ApplicationResult, dto::RenderedDocument};
use crate::domain::layout::Page;
use crate::domain::paper::Paper;

/// Turns laid-out pages into a printable document. Page numbers are stamped
/// here, not by the pagination engine.
pub trait RenderTarget: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn render(&self, paper: &Paper, pages: &[Page]) -> ApplicationResult<RenderedDocument>;
}
