// src/domain/layout/geometry.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("page geometry leaves no usable height ({usable_height} pt)")]
    DegenerateHeight { usable_height: f32 },
    #[error("header reservation leaves no usable height on the first page ({usable_height} pt)")]
    HeaderTooTall { usable_height: f32 },
    #[error("page geometry leaves no content width ({content_width} pt)")]
    DegenerateWidth { content_width: f32 },
    #[error("page geometry field {field} is not a finite non-negative number")]
    InvalidDimension { field: &'static str },
}

/// Physical page description in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Banner, exam metadata and general instructions on page one.
    pub header_height: f32,
    /// Reserved on every page for the page number stamp.
    pub footer_height: f32,
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin_top: 56.0,
            margin_bottom: 56.0,
            margin_left: 56.0,
            margin_right: 56.0,
            header_height: 160.0,
            footer_height: 24.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub fn usable_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom - self.footer_height
    }

    pub fn first_page_usable_height(&self) -> f32 {
        self.usable_height() - self.header_height
    }

    /// Usable height of the 1-based page `index`.
    pub fn usable_height_of(&self, index: u32) -> f32 {
        if index <= 1 {
            self.first_page_usable_height()
        } else {
            self.usable_height()
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("header_height", self.header_height),
            ("footer_height", self.footer_height),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(LayoutError::InvalidDimension { field });
        }
        if self.usable_height() <= 0.0 {
            return Err(LayoutError::DegenerateHeight {
                usable_height: self.usable_height(),
            });
        }
        if self.first_page_usable_height() <= 0.0 {
            return Err(LayoutError::HeaderTooTall {
                usable_height: self.first_page_usable_height(),
            });
        }
        if self.content_width() <= 0.0 {
            return Err(LayoutError::DegenerateWidth {
                content_width: self.content_width(),
            });
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}
