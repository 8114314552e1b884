// src/domain/errors.rs
use crate::domain::paper::{PaperStatus, WorkflowViolation};
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("paper is {0}; questions and parts can only be edited in draft or rejected")]
    NotEditable(PaperStatus),
    #[error(transparent)]
    Workflow(#[from] WorkflowViolation),
}
