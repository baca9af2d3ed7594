pub mod service;

pub use service::{ImportJobService, ImportRequest};
