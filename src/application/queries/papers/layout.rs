use std::sync::Arc;

use tracing::{debug, info};

use super::{GetPaperQuery, PaperQueryService, cache::LayoutCache};
use crate::{
    application::{
        dto::{AuthenticatedUser, LayoutDto, RenderedDocument},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        layout::{Page, fingerprint},
        paper::{Paper, PaperStatus},
    },
};

impl PaperQueryService {
    /// Print preview; available in every workflow state.
    pub async fn preview_layout(
        &self,
        actor: &AuthenticatedUser,
        query: GetPaperQuery,
    ) -> ApplicationResult<LayoutDto> {
        let paper = self.load(actor, query.id).await?;
        let (fingerprint, pages) = self.layout_of(&paper)?;
        Ok(LayoutDto::new(paper.id.into(), paper.status(), fingerprint, pages))
    }

    /// Lays out an approved paper and hands the pages to the render target.
    pub async fn render_paper(
        &self,
        actor: &AuthenticatedUser,
        query: GetPaperQuery,
    ) -> ApplicationResult<RenderedDocument> {
        let paper = self.load(actor, query.id).await?;
        if paper.status() != PaperStatus::Approved {
            return Err(ApplicationError::conflict(format!(
                "paper {} is {}; only approved papers can be rendered",
                paper.id,
                paper.status()
            )));
        }
        let (fingerprint, pages) = self.layout_of(&paper)?;
        let document = self.render_target.render(&paper, &pages)?;
        info!(
            paper_id = %paper.id,
            pages = pages.len(),
            %fingerprint,
            bytes = document.bytes.len(),
            content_type = %document.content_type,
            "paper rendered"
        );
        Ok(document)
    }

    pub fn layout_of(&self, paper: &Paper) -> ApplicationResult<(String, Arc<Vec<Page>>)> {
        let key = LayoutCache::key(
            paper.parts(),
            paper.questions(),
            &self.geometry,
            self.engine.settings(),
        )?;
        if let Some(hit) = self.cache.get(&key) {
            debug!(paper_id = %paper.id, "layout cache hit");
            return Ok(hit);
        }

        let pages = Arc::new(self.engine.layout_paper(paper, &self.geometry)?);
        let fingerprint = fingerprint(&pages);
        debug!(paper_id = %paper.id, pages = pages.len(), %fingerprint, "layout computed");
        self.cache
            .insert(key, fingerprint.clone(), Arc::clone(&pages));
        Ok((fingerprint, pages))
    }
}
