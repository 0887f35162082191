// src/fetch/models.rs

/// A fetched page, handed to the extractor once and then dropped.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub html: String,
}
