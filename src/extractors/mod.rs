// src/extractors/mod.rs
pub mod dataset;
pub mod headers;
pub mod table;
pub mod text;

// Re-export key extraction types for convenience
pub use dataset::Dataset;
pub use table::{ExtractedTable, TableExtractor};
