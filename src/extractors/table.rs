// src/extractors/table.rs

// --- Imports ---
use crate::extractors::dataset::Dataset;
use crate::extractors::headers::{make_headers_unique, placeholder_headers};
use crate::extractors::text::{clean_text, sanitize_title};
use crate::fetch::RawDocument;
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

// --- Constants ---
pub const UNTITLED_TABLE: &str = "Untitled_Table";

// Only the first rows of a table are searched for header cells
const HEADER_ROW_LOOKAHEAD: usize = 2;

// --- CSS Selectors (Lazy Static) ---
// Headings and tables together, so one pass yields both in document order
static HEADING_OR_TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2, h3, h4, table").expect("Failed to compile HEADING_OR_TABLE_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static HEADER_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th").expect("Failed to compile HEADER_CELL_SELECTOR"));

static DATA_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile DATA_CELL_SELECTOR"));

// --- Data Structures ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedTable {
    pub title: String,      // Sanitized heading text or UNTITLED_TABLE
    pub index: usize,       // 1-based position within the page
    pub source_url: String, // Page the table came from
    pub data: Dataset,      // Final headers and rectangular rows
    #[serde(skip)]
    pub html: String, // Rendered markup for display
}

impl ExtractedTable {
    pub fn headers(&self) -> &[String] {
        &self.data.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.data.rows
    }
}

/// Everything extracted from one page.
#[derive(Debug, Clone)]
pub struct PageTables {
    pub url: String,
    pub tables: Vec<ExtractedTable>,
    pub combined: Dataset, // All tables of the page stacked together
}

/// A section heading and the first table following it in document order.
#[derive(Debug)]
struct HeadingCandidate<'a> {
    text: String,
    position: usize,
    next_table: Option<ElementRef<'a>>,
}

// --- Main Extractor Structure ---
#[derive(Debug, Default)]
pub struct TableExtractor;

impl TableExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// Extracts and normalizes every table of a fetched page.
    pub fn extract(&self, document: &RawDocument) -> Result<PageTables, ExtractError> {
        tracing::info!("Extracting tables from {} ({} bytes)", document.url, document.html.len());

        // 1. Parse the HTML document
        let html = Html::parse_document(&document.html);

        // 2. Locate tables and headings in a single document-order pass
        let (tables, headings) = self.locate_tables_and_headings(&html);
        if tables.is_empty() {
            tracing::warn!("No tables found on {}", document.url);
            return Err(ExtractError::NoTablesFound {
                url: document.url.clone(),
            });
        }
        tracing::debug!("Found {} tables and {} headings", tables.len(), headings.len());

        // 3. Normalize each table
        let mut extracted = Vec::with_capacity(tables.len());
        for (i, table) in tables.iter().enumerate() {
            let index = i + 1;
            let title = self.resolve_title(*table, &headings);
            let data = self.build_dataset(*table, &title)?;

            tracing::debug!(
                "Table {} '{}': {} columns, {} rows",
                index,
                title,
                data.columns.len(),
                data.rows.len()
            );

            extracted.push(ExtractedTable {
                html: data.to_html(),
                title,
                index,
                source_url: document.url.clone(),
                data,
            });
        }

        // 4. Stack the page's tables into one dataset
        let combined = Dataset::concat(extracted.iter().map(|t| &t.data));

        tracing::info!(
            "Extracted {} tables ({} combined rows) from {}",
            extracted.len(),
            combined.rows.len(),
            document.url
        );

        Ok(PageTables {
            url: document.url.clone(),
            tables: extracted,
            combined,
        })
    }

    /// Returns all tables plus every h2-h4 heading with its next table attached.
    fn locate_tables_and_headings<'a>(
        &self,
        document: &'a Html,
    ) -> (Vec<ElementRef<'a>>, Vec<HeadingCandidate<'a>>) {
        let mut tables = Vec::new();
        let mut headings: Vec<HeadingCandidate<'a>> = Vec::new();
        // Headings that have not seen a table after them yet
        let mut waiting = 0;

        for (position, element) in document.select(&HEADING_OR_TABLE_SELECTOR).enumerate() {
            if element.value().name() == "table" {
                for heading in &mut headings[waiting..] {
                    heading.next_table = Some(element);
                }
                waiting = headings.len();
                tables.push(element);
            } else {
                headings.push(HeadingCandidate {
                    text: element.text().collect::<String>().trim().to_string(),
                    position,
                    next_table: None,
                });
            }
        }

        (tables, headings)
    }

    /// The last heading whose next table is `table` names it.
    fn resolve_title(&self, table: ElementRef, headings: &[HeadingCandidate]) -> String {
        headings
            .iter()
            .rev()
            .find(|heading| heading.next_table.map(|next| next.id()) == Some(table.id()))
            .map(|heading| {
                tracing::trace!("Heading at position {} titles table: '{}'", heading.position, heading.text);
                sanitize_title(&heading.text)
            })
            .unwrap_or_else(|| UNTITLED_TABLE.to_string())
    }

    /// Extracts headers and rows, then forces them into a rectangle.
    fn build_dataset(&self, table: ElementRef, title: &str) -> Result<Dataset, ExtractError> {
        let headers = self.extract_headers(table);
        let rows = self.extract_rows(table);

        // Header count is only checked against the first data row
        let mut headers = match rows.first() {
            Some(first) if !headers.is_empty() && headers.len() != first.len() => {
                tracing::warn!(
                    "Table '{}': {} headers but first row has {} cells, using placeholders",
                    title,
                    headers.len(),
                    first.len()
                );
                placeholder_headers(first.len())
            }
            _ => headers,
        };
        headers = make_headers_unique(&headers);

        // Decide the final column set up front, then build in one pass
        let max_width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if !rows.is_empty() && headers.len() != max_width {
            tracing::warn!(
                "Error in table '{}': Adjusting headers dynamically ({} -> {} columns).",
                title,
                headers.len(),
                max_width
            );
            headers = placeholder_headers(max_width);
        }

        Dataset::from_rows(title, headers, rows)
    }

    /// Header cells of the first two rows; the later row with any `th` wins.
    fn extract_headers(&self, table: ElementRef) -> Vec<String> {
        let mut headers = Vec::new();
        for header_row in table.select(&ROW_SELECTOR).take(HEADER_ROW_LOOKAHEAD) {
            let row_headers: Vec<String> = header_row
                .select(&HEADER_CELL_SELECTOR)
                .map(cell_text)
                .collect();
            if !row_headers.is_empty() {
                headers = row_headers;
            }
        }
        headers
    }

    /// Data cells of every row after the first; rows without `td` are skipped.
    fn extract_rows(&self, table: ElementRef) -> Vec<Vec<String>> {
        table
            .select(&ROW_SELECTOR)
            .skip(1)
            .map(|row| {
                row.select(&DATA_CELL_SELECTOR)
                    .map(cell_text)
                    .collect::<Vec<String>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect()
    }
}

fn cell_text(cell: ElementRef) -> String {
    clean_text(cell.text().collect::<String>().trim())
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> RawDocument {
        RawDocument {
            url: "https://example.org/page".to_string(),
            html: html.to_string(),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn results_page_end_to_end() {
        let html = r#"
            <html><body>
            <h2>Results</h2>
            <table>
              <tr><th>Team</th><th>Points</th></tr>
              <tr><td>Red[1]</td><td>10</td></tr>
              <tr><td>Blue</td><td>7</td></tr>
            </table>
            <p>Some text</p>
            <table>
              <tr><td>x</td><td>y</td><td>z</td></tr>
              <tr><td>1</td><td>2</td><td>3</td></tr>
            </table>
            </body></html>
        "#;

        let page = TableExtractor::new().extract(&doc(html)).expect("extraction should succeed");

        assert_eq!(page.tables.len(), 2);
        let first = &page.tables[0];
        let second = &page.tables[1];

        assert_eq!(first.title, "Results");
        assert_eq!(first.index, 1);
        assert_eq!(first.headers(), strings(&["Team", "Points"]).as_slice());
        assert_eq!(first.rows()[0], strings(&["Red", "10"]));

        assert_eq!(second.title, UNTITLED_TABLE);
        assert_eq!(second.index, 2);
        assert_eq!(second.headers(), strings(&["Column 1", "Column 2", "Column 3"]).as_slice());
        assert_eq!(second.rows(), &[strings(&["1", "2", "3"])]);

        assert_eq!(
            page.combined.rows.len(),
            first.rows().len() + second.rows().len()
        );
        assert_eq!(page.combined.columns.len(), 5);
    }

    #[test]
    fn no_tables_is_an_error() {
        let err = TableExtractor::new()
            .extract(&doc("<html><body><h2>Nothing</h2><p>here</p></body></html>"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoTablesFound { ref url } if url == "https://example.org/page"));
    }

    #[test]
    fn last_preceding_heading_wins() {
        let html = r#"
            <h2>Section</h2>
            <h3>Sub section: details</h3>
            <table><tr><th>A</th></tr><tr><td>1</td></tr></table>
            <table><tr><th>B</th></tr><tr><td>2</td></tr></table>
            <h4>Tail</h4>
        "#;
        let page = TableExtractor::new().extract(&doc(html)).unwrap();
        assert_eq!(page.tables[0].title, "Sub_section_details");
        // A heading only titles the first table after it
        assert_eq!(page.tables[1].title, UNTITLED_TABLE);
    }

    #[test]
    fn heading_levels_outside_range_are_ignored() {
        let html = r#"
            <h1>Page title</h1>
            <h5>Minor</h5>
            <table><tr><th>A</th></tr><tr><td>1</td></tr></table>
        "#;
        let page = TableExtractor::new().extract(&doc(html)).unwrap();
        assert_eq!(page.tables[0].title, UNTITLED_TABLE);
    }

    #[test]
    fn header_mismatch_against_first_row_uses_placeholders() {
        let html = r#"
            <table>
              <tr><th>One</th><th>Two</th><th>Three</th></tr>
              <tr><td>a</td><td>b</td></tr>
              <tr><td>c</td><td>d</td></tr>
            </table>
        "#;
        let page = TableExtractor::new().extract(&doc(html)).unwrap();
        assert_eq!(page.tables[0].headers(), strings(&["Column 1", "Column 2"]).as_slice());
    }

    #[test]
    fn second_header_row_overrides_first() {
        let html = r#"
            <table>
              <tr><th colspan="2">Group</th></tr>
              <tr><th>Left</th><th>Right</th></tr>
              <tr><td>1</td><td>2</td></tr>
            </table>
        "#;
        let page = TableExtractor::new().extract(&doc(html)).unwrap();
        let table = &page.tables[0];
        assert_eq!(table.headers(), strings(&["Left", "Right"]).as_slice());
        // The second header row has no td cells, so it is not a data row
        assert_eq!(table.rows(), &[strings(&["1", "2"])]);
    }

    #[test]
    fn duplicate_headers_are_renamed() {
        let html = r#"
            <table>
              <tr><th>Score</th><th>Score</th><th>Name</th></tr>
              <tr><td>1</td><td>2</td><td>x</td></tr>
            </table>
        "#;
        let page = TableExtractor::new().extract(&doc(html)).unwrap();
        assert_eq!(
            page.tables[0].headers(),
            strings(&["Score", "Score (2)", "Name"]).as_slice()
        );
    }

    #[test]
    fn ragged_rows_fall_back_to_widest_row() {
        let html = r#"
            <table>
              <tr><th>A</th><th>B</th></tr>
              <tr><td>1</td><td>2</td></tr>
              <tr><td>3</td><td>4</td><td>5</td></tr>
              <tr><td>6</td></tr>
            </table>
        "#;
        let page = TableExtractor::new().extract(&doc(html)).unwrap();
        let table = &page.tables[0];
        assert_eq!(table.headers(), strings(&["Column 1", "Column 2", "Column 3"]).as_slice());
        assert_eq!(table.rows()[0], strings(&["1", "2", ""]));
        assert_eq!(table.rows()[2], strings(&["6", "", ""]));
        assert!(table.rows().iter().all(|r| r.len() == table.headers().len()));
    }

    #[test]
    fn header_only_table_keeps_headers() {
        let html = r#"<table><tr><th>Only</th><th>Headers</th></tr></table>"#;
        let page = TableExtractor::new().extract(&doc(html)).unwrap();
        assert_eq!(page.tables[0].headers(), strings(&["Only", "Headers"]).as_slice());
        assert!(page.tables[0].rows().is_empty());
    }

    #[test]
    fn headerless_table_gets_placeholders() {
        let html = r#"<table><tr><td>skipped first row</td></tr><tr><td>a</td><td>b</td></tr></table>"#;
        let page = TableExtractor::new().extract(&doc(html)).unwrap();
        assert_eq!(page.tables[0].headers(), strings(&["Column 1", "Column 2"]).as_slice());
        assert_eq!(page.tables[0].rows(), &[strings(&["a", "b"])]);
    }

    #[test]
    fn rendered_html_contains_cells() {
        let html = r#"<h3>Tiny</h3><table><tr><th>K</th></tr><tr><td>v &amp; w</td></tr></table>"#;
        let page = TableExtractor::new().extract(&doc(html)).unwrap();
        let rendered = &page.tables[0].html;
        assert!(rendered.contains("table-bordered"));
        assert!(rendered.contains("<th>K</th>"));
        assert!(rendered.contains("<td>v &amp; w</td>"));
    }
}
