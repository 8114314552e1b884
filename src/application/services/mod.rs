// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        commands::papers::{PaperCommandService, WorkflowPolicy},
        dto::AuthenticatedUser,
        error::ApplicationError,
        ports::{AuthenticatorPort, ClockPort, RenderTargetPort},
        queries::papers::PaperQueryService,
    },
    domain::{
        layout::{PageGeometry, PaginationEngine},
        paper::PaperRepository,
    },
};

pub struct ApplicationServices {
    pub paper_commands: Arc<PaperCommandService>,
    pub paper_queries: Arc<PaperQueryService>,
    authenticator: Arc<AuthenticatorPort>,
}

impl ApplicationServices {
    pub fn new(
        paper_repo: Arc<dyn PaperRepository>,
        authenticator: Arc<AuthenticatorPort>,
        render_target: Arc<RenderTargetPort>,
        clock: Arc<ClockPort>,
        engine: PaginationEngine,
        geometry: PageGeometry,
        policy: WorkflowPolicy,
    ) -> Self {
        let paper_commands = Arc::new(
            PaperCommandService::new(Arc::clone(&paper_repo), Arc::clone(&clock))
                .with_policy(policy),
        );
        let paper_queries = Arc::new(PaperQueryService::new(
            Arc::clone(&paper_repo),
            engine,
            geometry,
            render_target,
        ));

        Self {
            paper_commands,
            paper_queries,
            authenticator,
        }
    }

    pub fn authenticator(&self) -> Arc<AuthenticatorPort> {
        Arc::clone(&self.authenticator)
    }

    /// Authenticate a raw bearer token and ensure the subject holds the
    /// capability, so outer surfaces can gate actions with one call.
    pub async fn authenticate_and_authorize(
        &self,
        token: &str,
        resource: &str,
        action: &str,
    ) -> ApplicationResult<AuthenticatedUser> {
        let user = self.authenticator.authenticate(token).await?;
        if user.has_capability(resource, action) {
            Ok(user)
        } else {
            Err(ApplicationError::forbidden(format!(
                "missing capability {resource}:{action}"
            )))
        }
    }
}
