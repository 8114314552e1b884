pub mod entity;
pub mod part;
pub mod question;
pub mod repository;
pub mod specifications;
pub mod value_objects;
pub mod workflow;

pub use entity::{ExamMetadata, NewPaper, Paper, TransitionRequest};
pub use part::{BloomTarget, Part, PartInstructions, UnitTarget};
pub use question::{ChoiceSet, ImageSource, Question, QuestionImage};
pub use repository::PaperRepository;
pub use value_objects::{BloomLevel, PaperId, PartId, QuestionId, UnitId};
pub use workflow::{
    ApprovalRecord, PaperStatus, ViolationReason, WorkflowEvent, WorkflowViolation,
};
