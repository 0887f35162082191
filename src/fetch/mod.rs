// src/fetch/mod.rs
pub mod client;
pub mod models;

pub use client::{FetchConfig, HttpFetcher, PageFetcher};
pub use models::RawDocument;
