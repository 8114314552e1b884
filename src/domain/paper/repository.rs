use crate::domain::errors::DomainResult;
use crate::domain::paper::entity::{NewPaper, Paper};
use crate::domain::paper::value_objects::PaperId;
use async_trait::async_trait;

#[async_trait]
pub trait PaperRepository: Send + Sync {
    async fn insert(&self, paper: NewPaper) -> DomainResult<Paper>;

    async fn find_by_id(&self, id: PaperId) -> DomainResult<Option<Paper>>;

    /// Stores `paper` only if the stored copy still carries `paper.version`,
    /// returning the stored paper with its version bumped. A stale version
    /// yields `DomainError::Conflict`.
    async fn update(&self, paper: Paper) -> DomainResult<Paper>;

    async fn delete(&self, id: PaperId) -> DomainResult<()>;
}
