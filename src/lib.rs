pub mod constants;
pub mod error;
pub mod pipeline;

// Domain data shapes shared across layers
pub mod domain;

// Re-export the types callers touch day to day
pub use domain::{CleanResource, FieldValue, RawResource};
pub use error::{DirectoryError, Result};
pub use pipeline::processing::normalize::{DirectoryNormalizer, NormalizedDirectory, Normalizer};
