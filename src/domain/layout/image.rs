// src/domain/layout/image.rs
use crate::domain::paper::QuestionImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Why an image could not be sized. Never aborts a layout: the block is
/// emitted with a placeholder height and flagged as degraded instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageResolutionError {
    #[error("embedded image data could not be decoded: {0}")]
    Decode(String),
    #[error("unsupported image format")]
    UnsupportedFormat,
    #[error("image {0} has no known dimensions")]
    Unresolvable(String),
    #[error("image has zero width or height")]
    Empty,
}

/// Resolves an attached image to its intrinsic size.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, image: &QuestionImage) -> Result<ImageDimensions, ImageResolutionError>;
}

/// Trusts the dimensions declared on the question record.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredDimensions;

impl ImageResolver for DeclaredDimensions {
    fn resolve(&self, image: &QuestionImage) -> Result<ImageDimensions, ImageResolutionError> {
        if image.width == 0 || image.height == 0 {
            return Err(ImageResolutionError::Unresolvable(image.reference()));
        }
        Ok(ImageDimensions {
            width: image.width,
            height: image.height,
        })
    }
}
