// src/storage/mod.rs
use crate::extractors::dataset::Dataset;
use crate::extractors::text::sanitize_title;
use crate::utils::error::StorageError;
use csv::WriterBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File name of the dataset spanning every table of a run.
pub const COMBINED_FILE_NAME: &str = "all_tables_combined.csv";

/// File name for one extracted table, e.g. `Results_table_1.csv`.
pub fn table_file_name(title: &str, index: usize) -> String {
    format!("{}_table_{}.csv", sanitize_title(title), index)
}

/// Persistence for extracted datasets, addressed by file name.
pub trait TableStore: Send + Sync {
    /// Stores `dataset` as CSV under `name` and returns the name to fetch it by.
    fn save(&self, name: &str, dataset: &Dataset) -> Result<String, StorageError>;

    /// Returns the stored CSV bytes.
    fn load(&self, name: &str) -> Result<Vec<u8>, StorageError>;
}

/// Serializes a dataset to CSV, header line first.
pub fn dataset_to_csv(dataset: &Dataset) -> Result<Vec<u8>, StorageError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    if !dataset.columns.is_empty() {
        writer.write_record(&dataset.columns)?;
    }
    for row in &dataset.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|e| StorageError::IoError(e.into_error()))
}

// Names come from URLs on the download routes; never let them leave the directory
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && name != "."
        && name != ".."
}

/// Writes CSV files into a single output directory.
pub struct FsTableStore {
    base_dir: PathBuf,
}

impl FsTableStore {
    /// Creates a new store with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl TableStore for FsTableStore {
    fn save(&self, name: &str, dataset: &Dataset) -> Result<String, StorageError> {
        if !is_plain_file_name(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let file_path = self.base_dir.join(name);
        fs::write(&file_path, dataset_to_csv(dataset)?)?;

        tracing::info!("Saved table to {}", file_path.display());
        Ok(name.to_string())
    }

    fn load(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        if !is_plain_file_name(name) {
            tracing::warn!("Rejected download name: {}", name);
            return Err(StorageError::NotFound(name.to_string()));
        }

        let file_path = self.base_dir.join(name);
        if !file_path.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let bytes = fs::read(&file_path)?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), file_path.display());
        Ok(bytes)
    }
}

/// Keeps CSV bytes in memory; used where touching disk is unwanted.
#[derive(Default)]
pub struct MemoryTableStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of everything stored so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let files = self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = files.keys().cloned().collect();
        names.sort();
        names
    }
}

impl TableStore for MemoryTableStore {
    fn save(&self, name: &str, dataset: &Dataset) -> Result<String, StorageError> {
        let bytes = dataset_to_csv(dataset)?;
        let mut files = self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        files.insert(name.to_string(), bytes);
        Ok(name.to_string())
    }

    fn load(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let files = self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        files
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }
}
