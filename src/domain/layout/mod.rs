//! Deterministic pagination of question papers.

pub mod engine;
pub mod geometry;
pub mod image;
pub mod measure;

pub use engine::{Block, BlockKind, LayoutSettings, Page, PaginationEngine};
pub use geometry::{LayoutError, PageGeometry};
pub use image::{DeclaredDimensions, ImageDimensions, ImageResolutionError, ImageResolver};
pub use measure::{HeuristicMeasurer, TextMeasurer, strip_markup};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Stable digest of a layout; equal pages always give equal fingerprints.
pub fn fingerprint(pages: &[Page]) -> String {
    let mut hasher = Sha256::new();
    for page in pages {
        hasher.update(page.index.to_le_bytes());
        hasher.update(page.usable_height.to_bits().to_le_bytes());
        for block in &page.blocks {
            hasher.update(block.kind.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update(block.part_id.as_str().as_bytes());
            hasher.update([0u8]);
            let source = block.source_question_id.map(i64::from).unwrap_or(0);
            hasher.update(source.to_le_bytes());
            hasher.update(block.number.unwrap_or(0).to_le_bytes());
            hasher.update(block.content.as_bytes());
            hasher.update([0u8]);
            hasher.update(block.height_estimate.to_bits().to_le_bytes());
            hasher.update(block.top.to_bits().to_le_bytes());
            hasher.update([u8::from(block.degraded), u8::from(block.overflow)]);
        }
    }
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}
