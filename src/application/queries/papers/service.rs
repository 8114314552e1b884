use std::sync::Arc;

use super::cache::LayoutCache;
use crate::{
    application::{
        dto::AuthenticatedUser,
        error::{ApplicationError, ApplicationResult},
        ports::RenderTargetPort,
    },
    domain::{
        layout::{PageGeometry, PaginationEngine},
        paper::{Paper, PaperId, PaperRepository},
        user::PAPERS,
    },
};

pub struct PaperQueryService {
    pub(super) repo: Arc<dyn PaperRepository>,
    pub(super) engine: PaginationEngine,
    pub(super) geometry: PageGeometry,
    pub(super) render_target: Arc<RenderTargetPort>,
    pub(super) cache: LayoutCache,
}

impl PaperQueryService {
    pub fn new(
        repo: Arc<dyn PaperRepository>,
        engine: PaginationEngine,
        geometry: PageGeometry,
        render_target: Arc<RenderTargetPort>,
    ) -> Self {
        Self {
            repo,
            engine,
            geometry,
            render_target,
            cache: LayoutCache::default(),
        }
    }

    pub fn with_cache(mut self, cache: LayoutCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub(super) async fn load(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<Paper> {
        if !actor.has_capability(PAPERS, "read") {
            return Err(ApplicationError::forbidden(format!(
                "missing capability {PAPERS}:read"
            )));
        }
        let id = PaperId::new(id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("paper {id} not found")))
    }
}
