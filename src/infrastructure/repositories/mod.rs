// src/infrastructure/repositories/mod.rs
mod in_memory_paper;

pub use in_memory_paper::InMemoryPaperRepository;
