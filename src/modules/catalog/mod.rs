/// Content catalog module
///
/// Durable, deduplicated storage of imported movie and series records.
/// The import pipeline only ever inserts; updating an existing record when
/// upstream data changes is deliberately out of scope.
pub mod domain;
pub mod infrastructure;

pub use domain::{CatalogRepository, ContentRecord, MediaType, NewContentRecord};
pub use infrastructure::CatalogRepositoryImpl;
