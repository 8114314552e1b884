mod cache;
mod get;
mod layout;
mod reports;
mod service;

pub use cache::LayoutCache;
pub use get::GetPaperQuery;
pub use service::PaperQueryService;
