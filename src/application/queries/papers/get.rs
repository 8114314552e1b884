use super::PaperQueryService;
use crate::application::{
    dto::{ApprovalRecordDto, AuthenticatedUser, PaperDto},
    error::ApplicationResult,
};

pub struct GetPaperQuery {
    pub id: i64,
}

impl PaperQueryService {
    pub async fn get_paper(
        &self,
        actor: &AuthenticatedUser,
        query: GetPaperQuery,
    ) -> ApplicationResult<PaperDto> {
        let paper = self.load(actor, query.id).await?;
        Ok(paper.into())
    }

    /// Approval records oldest first.
    pub async fn approval_history(
        &self,
        actor: &AuthenticatedUser,
        query: GetPaperQuery,
    ) -> ApplicationResult<Vec<ApprovalRecordDto>> {
        let paper = self.load(actor, query.id).await?;
        Ok(paper
            .approval_history()
            .iter()
            .cloned()
            .map(ApprovalRecordDto::from)
            .collect())
    }
}
