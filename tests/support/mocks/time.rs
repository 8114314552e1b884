// tests/support/mocks/time.rs
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use qpaper_core::application::ports::time::Clock;

static FIXED_NOW: Lazy<DateTime<Utc>> = Lazy::new(|| {
    DateTime::parse_from_rfc3339("2026-03-02T09:30:00Z")
        .expect("invalid RFC3339 in tests/support/mocks/time.rs")
        .with_timezone(&Utc)
});

/// Deterministic timestamp shared by every test.
pub fn fixed_now() -> DateTime<Utc> {
    *FIXED_NOW
}

#[derive(Default, Clone, Copy)]
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_now()
    }
}
