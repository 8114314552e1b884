// src/application/commands/papers/delete.rs
use tracing::info;

use super::{PaperCommandService, capability::ensure_capability};
use crate::{
    application::{dto::AuthenticatedUser, error::ApplicationResult},
    domain::paper::PaperId,
};

pub struct DeletePaperCommand {
    pub id: i64,
}

impl PaperCommandService {
    pub async fn delete_paper(
        &self,
        actor: &AuthenticatedUser,
        command: DeletePaperCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "delete")?;
        let id = PaperId::new(command.id)?;
        {
            let _guard = self.locks.acquire(id).await;
            self.load(id).await?;
            self.repo.delete(id).await?;
        }
        self.locks.forget(id);
        info!(paper_id = %id, actor = %actor.id, "paper deleted");
        Ok(())
    }
}
