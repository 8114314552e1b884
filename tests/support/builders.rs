// tests/support/builders.rs
use std::sync::Arc;

use qpaper_core::application::{
    commands::papers::{AddQuestionCommand, CreatePaperCommand, PaperCommandService, WorkflowPolicy},
    dto::{AuthenticatedUser, PaperDto},
    queries::papers::PaperQueryService,
};
use qpaper_core::domain::{
    distribution::DistributionTargets,
    layout::{HeuristicMeasurer, LayoutSettings, PageGeometry, PaginationEngine},
    paper::{BloomLevel, ExamMetadata, Part, PartId, Question, QuestionId, UnitId},
    user::{Role, UserId},
};
use qpaper_core::infrastructure::repositories::InMemoryPaperRepository;

use super::mocks::{FixedClock, RecordingRenderTarget};

pub fn drafter() -> AuthenticatedUser {
    AuthenticatedUser::with_role(UserId::new(10).unwrap(), "drafter", Role::Drafter)
}

pub fn approver() -> AuthenticatedUser {
    AuthenticatedUser::with_role(UserId::new(20).unwrap(), "approver", Role::Approver)
}

pub fn admin() -> AuthenticatedUser {
    AuthenticatedUser::with_role(UserId::new(30).unwrap(), "admin", Role::Admin)
}

pub fn unit(n: u8) -> UnitId {
    UnitId::new(n).unwrap()
}

pub fn part_id(id: &str) -> PartId {
    PartId::new(id).unwrap()
}

pub fn metadata() -> ExamMetadata {
    ExamMetadata {
        institution: "Example Institute of Technology".into(),
        course: "B.E. Computer Science".into(),
        semester: "IV".into(),
        subject_code: "CS3492".into(),
        subject_name: "Database Management Systems".into(),
        max_marks: 10,
        duration_minutes: 30,
        exam_date: None,
    }
}

/// 5 questions x 2 marks; one question per unit 1..=5; bloom 2/2/1.
pub fn part_a() -> Part {
    Part::new(part_id("A"), "PART A", 2, 5)
        .unwrap()
        .with_instructions("Answer ALL questions", "5 x 2 = 10 marks")
        .with_unit_count(unit(1), 1)
        .with_unit_count(unit(2), 1)
        .with_unit_count(unit(3), 1)
        .with_unit_count(unit(4), 1)
        .with_unit_count(unit(5), 1)
        .with_bloom_count(BloomLevel::Remember, 2)
        .with_bloom_count(BloomLevel::Understand, 2)
        .with_bloom_count(BloomLevel::Apply, 1)
}

/// Unit and bloom tags matching `part_a` exactly.
pub fn part_a_tags() -> [(u8, BloomLevel); 5] {
    [
        (1, BloomLevel::Remember),
        (2, BloomLevel::Remember),
        (3, BloomLevel::Understand),
        (4, BloomLevel::Understand),
        (5, BloomLevel::Apply),
    ]
}

pub fn question(id: i64, part: &str, unit_no: u8, bloom: BloomLevel, marks: u32) -> Question {
    Question::new(
        QuestionId::new(id).unwrap(),
        format!("Question {id}: explain the concept in detail."),
        part_id(part),
        unit(unit_no),
        bloom,
        marks,
    )
    .unwrap()
}

pub fn create_command() -> CreatePaperCommand {
    CreatePaperCommand::builder()
        .metadata(metadata())
        .targets(DistributionTargets::new(10, 5))
        .part(part_a())
        .build()
        .unwrap()
}

pub fn add_question_command(paper_id: i64, unit_no: u8, bloom: BloomLevel) -> AddQuestionCommand {
    AddQuestionCommand {
        paper_id,
        part_id: "A".into(),
        text: format!("Describe topic {unit_no} with an example."),
        unit: unit_no,
        bloom,
        marks: 2,
        image: None,
        choices: None,
    }
}

/// Small page: 10pt lines, 40 characters per line, 120pt usable.
pub fn small_geometry() -> PageGeometry {
    PageGeometry {
        page_width: 200.0,
        page_height: 120.0,
        margin_top: 0.0,
        margin_bottom: 0.0,
        margin_left: 0.0,
        margin_right: 0.0,
        header_height: 0.0,
        footer_height: 0.0,
    }
}

pub fn small_engine() -> PaginationEngine {
    PaginationEngine::new(LayoutSettings {
        block_gap: 0.0,
        max_image_height_ratio: 0.5,
        image_placeholder_height: 20.0,
    })
    .with_text_measurer(Arc::new(HeuristicMeasurer::new(5.0, 10.0)))
}

pub struct Harness {
    pub repo: Arc<InMemoryPaperRepository>,
    pub commands: Arc<PaperCommandService>,
    pub queries: PaperQueryService,
    pub render: Arc<RecordingRenderTarget>,
}

pub fn harness() -> Harness {
    harness_with_policy(WorkflowPolicy::default())
}

pub fn harness_with_policy(policy: WorkflowPolicy) -> Harness {
    let repo = Arc::new(InMemoryPaperRepository::new());
    let render = Arc::new(RecordingRenderTarget::default());
    let commands = Arc::new(
        PaperCommandService::new(repo.clone(), Arc::new(FixedClock)).with_policy(policy),
    );
    let queries = PaperQueryService::new(
        repo.clone(),
        PaginationEngine::default(),
        PageGeometry::a4(),
        render.clone(),
    );
    Harness {
        repo,
        commands,
        queries,
        render,
    }
}

impl Harness {
    /// A draft paper with Part A fully assembled to match its scheme.
    pub async fn assembled_paper(&self) -> PaperDto {
        let actor = drafter();
        let created = self
            .commands
            .create_paper(&actor, create_command())
            .await
            .unwrap();
        let mut latest = created;
        for (unit_no, bloom) in part_a_tags() {
            latest = self
                .commands
                .add_question(&actor, add_question_command(latest.id, unit_no, bloom))
                .await
                .unwrap();
        }
        latest
    }
}
