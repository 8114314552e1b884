// src/infrastructure/render.rs
use chrono::NaiveDate;
use serde::Serialize;

use crate::application::{
    ApplicationResult, dto::RenderedDocument, error::ApplicationError,
    ports::render::RenderTarget,
};
use crate::domain::layout::{Block, Page, fingerprint};
use crate::domain::paper::Paper;

const CONTENT_TYPE: &str = "application/json";

/// Emits the laid-out paper as a JSON document, one entry per page with its
/// printed page label.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderTarget {
    pretty: bool,
}

impl JsonRenderTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

#[derive(Serialize)]
struct Document<'a> {
    paper_id: i64,
    institution: &'a str,
    course: &'a str,
    semester: &'a str,
    subject_code: &'a str,
    subject_name: &'a str,
    max_marks: u32,
    duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    exam_date: Option<NaiveDate>,
    fingerprint: String,
    page_count: usize,
    pages: Vec<DocumentPage<'a>>,
}

#[derive(Serialize)]
struct DocumentPage<'a> {
    number: u32,
    label: String,
    blocks: &'a [Block],
}

impl RenderTarget for JsonRenderTarget {
    fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    fn render(&self, paper: &Paper, pages: &[Page]) -> ApplicationResult<RenderedDocument> {
        let total = pages.len();
        let metadata = &paper.metadata;
        let document = Document {
            paper_id: paper.id.into(),
            institution: &metadata.institution,
            course: &metadata.course,
            semester: &metadata.semester,
            subject_code: &metadata.subject_code,
            subject_name: &metadata.subject_name,
            max_marks: metadata.max_marks,
            duration_minutes: metadata.duration_minutes,
            exam_date: metadata.exam_date,
            fingerprint: fingerprint(pages),
            page_count: total,
            pages: pages
                .iter()
                .map(|page| DocumentPage {
                    number: page.index,
                    label: format!("Page {} of {total}", page.index),
                    blocks: &page.blocks,
                })
                .collect(),
        };

        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        }
        .map_err(|e| ApplicationError::infrastructure(format!("render failed: {e}")))?;

        Ok(RenderedDocument {
            content_type: CONTENT_TYPE.to_string(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::distribution::DistributionTargets;
    use crate::domain::paper::{ExamMetadata, NewPaper, PaperId};
    use crate::domain::user::UserId;
    use chrono::Utc;

    #[test]
    fn pages_are_labelled_with_totals() {
        let metadata = ExamMetadata {
            subject_code: "MA3151".into(),
            max_marks: 100,
            ..ExamMetadata::default()
        };
        let paper = Paper::from_new(
            PaperId::new(3).unwrap(),
            NewPaper::new(
                metadata,
                DistributionTargets::new(100, 20),
                Vec::new(),
                UserId::new(1).unwrap(),
                Utc::now(),
            )
            .unwrap(),
        );
        let pages: Vec<Page> = (1..=2)
            .map(|index| Page {
                index,
                usable_height: 700.0,
                used_height: 0.0,
                blocks: Vec::new(),
            })
            .collect();

        let doc = JsonRenderTarget::new().render(&paper, &pages).unwrap();
        assert_eq!(doc.content_type, "application/json");
        let json: serde_json::Value = serde_json::from_slice(&doc.bytes).unwrap();
        assert_eq!(json["paper_id"], 3);
        assert_eq!(json["subject_code"], "MA3151");
        assert_eq!(json["pages"][1]["label"], "Page 2 of 2");
    }
}
