use crate::domain::layout::Page;
use crate::domain::paper::PaperStatus;
use serde::Serialize;
use std::sync::Arc;

/// Pages computed for a paper, shared with the layout cache.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutDto {
    pub paper_id: i64,
    pub status: PaperStatus,
    pub fingerprint: String,
    pub page_count: usize,
    pub degraded_blocks: usize,
    pub overflow_blocks: usize,
    pub pages: Arc<Vec<Page>>,
}

impl LayoutDto {
    pub fn new(paper_id: i64, status: PaperStatus, fingerprint: String, pages: Arc<Vec<Page>>) -> Self {
        let blocks = || pages.iter().flat_map(|page| page.blocks.iter());
        Self {
            paper_id,
            status,
            fingerprint,
            page_count: pages.len(),
            degraded_blocks: blocks().filter(|b| b.degraded).count(),
            overflow_blocks: blocks().filter(|b| b.overflow).count(),
            pages,
        }
    }
}

/// Bytes produced by a render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: String,
    pub bytes: Vec<u8>,
}
