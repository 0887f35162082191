// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Timeouts, DNS, refused connections

    #[error("Failed to fetch {url}. Status Code: {status}")]
    Status { url: String, status: u16 }, // Anything other than 200 OK
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No tables found on {url}")]
    NoTablesFound { url: String },

    #[error("Row in table '{table}' has {width} cells but only {columns} columns were decided")]
    RowWidthExceeded {
        table: String,
        width: usize,
        columns: usize,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No stored table named '{0}'")]
    NotFound(String),

    #[error("Not a plain file name: '{0}'")]
    InvalidName(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Fetch and extraction errors are shown to the user as-is.
    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}
