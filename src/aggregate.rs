// src/aggregate.rs
use crate::extractors::{Dataset, ExtractedTable, TableExtractor};
use crate::fetch::PageFetcher;
use crate::storage::{table_file_name, TableStore, COMBINED_FILE_NAME};
use crate::utils::AppError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// An extracted table and the file name it was stored under.
#[derive(Debug, Clone, Serialize)]
pub struct SavedTable {
    #[serde(flatten)]
    pub table: ExtractedTable,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateOutcome {
    pub tables: Vec<SavedTable>,
    /// Every table of the run stacked together; the JSON summary only
    /// carries its row count.
    #[serde(rename = "combined_rows", serialize_with = "serialize_row_count")]
    pub combined: Dataset,
    pub extracted_at: DateTime<Utc>,
}

fn serialize_row_count<S: Serializer>(data: &Dataset, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(data.rows.len() as u64)
}

impl AggregateOutcome {
    fn empty() -> Self {
        Self {
            tables: Vec::new(),
            combined: Dataset::default(),
            extracted_at: Utc::now(),
        }
    }
}

/// One URL per line; surrounding whitespace and blank lines are ignored.
pub fn split_urls(block: &str) -> Vec<&str> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Fetches, extracts and stores the tables of every URL in `urls_block`.
///
/// URLs are handled one after another. The first failure aborts the run and
/// is returned on its own; tables stored before it are not reported. After
/// each URL the combined file is rewritten with every table seen so far.
pub async fn aggregate(
    fetcher: &dyn PageFetcher,
    store: &dyn TableStore,
    extractor: &TableExtractor,
    urls_block: &str,
) -> Result<AggregateOutcome, AppError> {
    let urls = split_urls(urls_block);
    if urls.is_empty() {
        tracing::info!("No URLs submitted");
        return Ok(AggregateOutcome::empty());
    }

    tracing::info!("Processing {} URL(s)", urls.len());
    let mut saved: Vec<SavedTable> = Vec::new();
    let mut combined = Dataset::default();

    for url in urls {
        let document = fetcher.fetch(url).await.map_err(|e| {
            tracing::error!("Fetch failed for {}: {}", url, e);
            AppError::from(e)
        })?;

        let page = extractor.extract(&document).map_err(|e| {
            tracing::error!("Extraction failed for {}: {}", url, e);
            AppError::from(e)
        })?;
        tracing::info!(
            "{}: {} table(s), {} rows",
            page.url,
            page.tables.len(),
            page.combined.rows.len()
        );

        for table in page.tables {
            let file_name = store.save(&table_file_name(&table.title, table.index), &table.data)?;
            saved.push(SavedTable { table, file_name });
        }

        combined.append(&page.combined);
        store.save(COMBINED_FILE_NAME, &combined)?;
        tracing::debug!("Combined file now holds {} rows", combined.rows.len());
    }

    tracing::info!(
        "Finished: {} tables, {} combined rows",
        saved.len(),
        combined.rows.len()
    );

    Ok(AggregateOutcome {
        tables: saved,
        combined,
        extracted_at: Utc::now(),
    })
}
