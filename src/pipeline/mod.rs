// Text cleansing pipeline: per-text normalization and the row-by-row batch driver

pub mod batch;
pub mod normalize;

// Re-export key types and functions from each stage
pub use batch::normalize_batch;
pub use normalize::{Normalizer, TextNormalizer};
