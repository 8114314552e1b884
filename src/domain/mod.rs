pub mod distribution;
pub mod errors;
pub mod layout;
pub mod paper;
pub mod question_set;
pub mod user;
