pub mod entities;
pub mod repository;

pub use entities::{ContentRecord, MediaType, NewContentRecord};
pub use repository::CatalogRepository;
