pub mod cache;
pub mod http_client;
pub mod service;
pub mod tmdb;
pub mod traits;
pub mod types;
pub mod wiki;

pub use cache::{RequestSignature, ResponseCache};
pub use service::ProviderService;
pub use traits::MetadataProvider;
pub use types::{PopularItem, TitleDetails, VideoRef};
