// src/application/commands/papers/mod.rs
mod capability;
mod create;
mod delete;
mod edit;
mod locks;
mod randomize;
mod service;
mod transition;

pub use create::{CreatePaperCommand, CreatePaperCommandBuilder};
pub use delete::DeletePaperCommand;
pub use edit::{
    AddQuestionCommand, ConfigurePartCommand, PutPartCommand, RemoveQuestionCommand,
    SetTargetsCommand, UpdateMetadataCommand, UpdateQuestionCommand,
};
pub use randomize::RandomizePartCommand;
pub use service::{PaperCommandService, WorkflowPolicy};
pub use transition::TransitionCommand;
