pub mod auth;
pub mod layout;
pub mod papers;
pub mod serde_time;

pub use auth::AuthenticatedUser;
pub use layout::{LayoutDto, RenderedDocument};
pub use papers::{ApprovalRecordDto, PaperDto, RandomizedPartDto};
