// tests/support/mod.rs
// Shared by several integration test binaries; each one uses a different
// subset, so unused items are expected.
#[allow(dead_code, unused_imports)]
pub mod mocks;

#[allow(dead_code, unused_imports)]
pub mod builders;

#[allow(unused_imports)]
pub use builders::*;
#[allow(unused_imports)]
pub use mocks::*;
