// src/application/commands/papers/capability.rs
use crate::application::{
    dto::AuthenticatedUser,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::paper::specifications::CanEditPaperSpec;
use crate::domain::user::PAPERS;

pub(super) fn ensure_capability(actor: &AuthenticatedUser, action: &str) -> ApplicationResult<()> {
    if actor.has_capability(PAPERS, action) {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(format!(
            "missing capability {PAPERS}:{action}"
        )))
    }
}

pub(super) fn ensure_can_edit(actor: &AuthenticatedUser) -> ApplicationResult<()> {
    if CanEditPaperSpec::new(&actor.capabilities).is_satisfied() {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(
            "insufficient privileges to edit paper",
        ))
    }
}
