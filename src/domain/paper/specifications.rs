// src/domain/paper/specifications.rs
use std::collections::HashSet;

use crate::domain::paper::workflow::WorkflowEvent;
use crate::domain::user::value_objects::{Capability, PAPERS};

pub struct CanTriggerEventSpec<'a> {
    capabilities: &'a HashSet<Capability>,
    event: WorkflowEvent,
}

impl<'a> CanTriggerEventSpec<'a> {
    pub fn new(capabilities: &'a HashSet<Capability>, event: WorkflowEvent) -> Self {
        Self {
            capabilities,
            event,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(PAPERS, self.event.required_action()))
    }

    pub fn required(&self) -> Capability {
        Capability::new(PAPERS, self.event.required_action())
    }
}

pub struct CanEditPaperSpec<'a> {
    capabilities: &'a HashSet<Capability>,
}

impl<'a> CanEditPaperSpec<'a> {
    pub fn new(capabilities: &'a HashSet<Capability>) -> Self {
        Self { capabilities }
    }

    pub fn is_satisfied(&self) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(PAPERS, "edit"))
    }
}
