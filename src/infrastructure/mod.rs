pub mod images;
pub mod render;
pub mod repositories;
pub mod security;
pub mod time;
