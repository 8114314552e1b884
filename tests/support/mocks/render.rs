// tests/support/mocks/render.rs
use std::sync::Mutex;

use qpaper_core::application::{
    ApplicationResult, dto::RenderedDocument, ports::render::RenderTarget,
};
use qpaper_core::domain::layout::Page;
use qpaper_core::domain::paper::Paper;

/// Remembers how many pages each render call received.
#[derive(Default)]
pub struct RecordingRenderTarget {
    pub calls: Mutex<Vec<usize>>,
}

impl RenderTarget for RecordingRenderTarget {
    fn content_type(&self) -> &'static str {
        "text/plain"
    }

    fn render(&self, paper: &Paper, pages: &[Page]) -> ApplicationResult<RenderedDocument> {
        self.calls.lock().unwrap().push(pages.len());
        Ok(RenderedDocument {
            content_type: self.content_type().to_string(),
            bytes: format!("{} pages for {}", pages.len(), paper.metadata.subject_code).into_bytes(),
        })
    }
}
