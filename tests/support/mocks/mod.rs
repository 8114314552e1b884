// tests/support/mocks/mod.rs
pub mod render;
pub mod time;

pub use render::RecordingRenderTarget;
pub use time::{FixedClock, fixed_now};
