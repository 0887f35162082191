// src/extractors/dataset.rs
use crate::utils::error::ExtractError;
use serde::Serialize;
use std::collections::HashMap;

/// CSS classes put on every rendered table.
const TABLE_CLASSES: &str = "table table-bordered table-striped";

/// A rectangular table of string cells.
///
/// Every row has exactly `columns.len()` cells; missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Builds a dataset with the given columns, padding short rows.
    ///
    /// `table` only names the source in the error returned when a row is wider
    /// than `columns`.
    pub fn from_rows(
        table: &str,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, ExtractError> {
        let width = columns.len();
        let mut padded = Vec::with_capacity(rows.len());

        for mut row in rows {
            if row.len() > width {
                return Err(ExtractError::RowWidthExceeded {
                    table: table.to_string(),
                    width: row.len(),
                    columns: width,
                });
            }
            row.resize(width, String::new());
            padded.push(row);
        }

        Ok(Self {
            columns,
            rows: padded,
        })
    }

    /// Stacks datasets on top of each other.
    ///
    /// The result's columns are the union of all inputs in first-seen order; a
    /// row gets an empty cell for every column its source did not have.
    pub fn concat<'a, I>(datasets: I) -> Self
    where
        I: IntoIterator<Item = &'a Dataset>,
    {
        let mut combined = Self::default();
        for ds in datasets {
            combined.append(ds);
        }
        combined
    }

    /// Appends the rows of `other` below the existing ones.
    ///
    /// Columns are matched by name and occurrence: the k-th column called `X`
    /// in `other` lands in the k-th column called `X` here, which is added at
    /// the end when missing. Existing rows are only touched when the column
    /// list grows.
    pub fn append(&mut self, other: &Dataset) {
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        let mut mapping = Vec::with_capacity(other.columns.len());

        for col in &other.columns {
            let nth = occurrences.entry(col.as_str()).or_insert(0);
            let existing = self
                .columns
                .iter()
                .enumerate()
                .filter(|(_, c)| *c == col)
                .nth(*nth)
                .map(|(i, _)| i);
            *nth += 1;

            let target = match existing {
                Some(i) => i,
                None => {
                    self.columns.push(col.clone());
                    self.columns.len() - 1
                }
            };
            mapping.push(target);
        }

        let width = self.columns.len();
        if self.rows.first().map_or(false, |r| r.len() != width) {
            for row in &mut self.rows {
                row.resize(width, String::new());
            }
        }

        self.rows.reserve(other.rows.len());
        for row in &other.rows {
            let mut combined = vec![String::new(); width];
            for (cell, &target) in row.iter().zip(&mapping) {
                combined[target] = cell.clone();
            }
            self.rows.push(combined);
        }
    }

    /// Renders the dataset as a bordered, striped HTML table.
    pub fn to_html(&self) -> String {
        let mut html = format!("<table border=\"1\" class=\"{}\">\n", TABLE_CLASSES);

        html.push_str("  <thead>\n    <tr>\n");
        for col in &self.columns {
            html.push_str("      <th>");
            html.push_str(&html_escape::encode_text(col));
            html.push_str("</th>\n");
        }
        html.push_str("    </tr>\n  </thead>\n");

        html.push_str("  <tbody>\n");
        for row in &self.rows {
            html.push_str("    <tr>\n");
            for cell in row {
                html.push_str("      <td>");
                html.push_str(&html_escape::encode_text(cell));
                html.push_str("</td>\n");
            }
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n</table>");

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn short_rows_are_padded() {
        let ds = Dataset::from_rows(
            "t",
            row(&["a", "b", "c"]),
            vec![row(&["1", "2", "3"]), row(&["4"])],
        )
        .unwrap();
        assert_eq!(ds.rows[1], row(&["4", "", ""]));
        assert!(ds.rows.iter().all(|r| r.len() == ds.columns.len()));
    }

    #[test]
    fn wide_rows_are_rejected() {
        let err = Dataset::from_rows("Scores", row(&["a"]), vec![row(&["1", "2"])]).unwrap_err();
        match err {
            ExtractError::RowWidthExceeded {
                table,
                width,
                columns,
            } => {
                assert_eq!(table, "Scores");
                assert_eq!(width, 2);
                assert_eq!(columns, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn concat_unions_columns_in_first_seen_order() {
        let first = Dataset::from_rows("a", row(&["Name", "Age"]), vec![row(&["Ann", "31"])]).unwrap();
        let second =
            Dataset::from_rows("b", row(&["Age", "City"]), vec![row(&["40", "Oslo"]), row(&["22", "Rome"])])
                .unwrap();

        let combined = Dataset::concat([&first, &second]);

        assert_eq!(combined.columns, row(&["Name", "Age", "City"]));
        assert_eq!(
            combined.rows,
            vec![
                row(&["Ann", "31", ""]),
                row(&["", "40", "Oslo"]),
                row(&["", "22", "Rome"]),
            ]
        );
    }

    #[test]
    fn concat_keeps_every_cell_of_repeated_column_names() {
        let first = Dataset::from_rows("a", row(&["A", "A", "B"]), vec![row(&["1", "2", "3"])]).unwrap();
        let second = Dataset::from_rows("b", row(&["A"]), vec![row(&["4"])]).unwrap();

        let combined = Dataset::concat([&first, &second]);

        assert_eq!(combined.columns, row(&["A", "A", "B"]));
        assert_eq!(
            combined.rows,
            vec![row(&["1", "2", "3"]), row(&["4", "", ""])]
        );
    }

    #[test]
    fn append_grows_columns_and_pads_earlier_rows() {
        let mut combined = Dataset::from_rows("a", row(&["Name"]), vec![row(&["Ann"])]).unwrap();
        let more = Dataset::from_rows("b", row(&["City", "Name"]), vec![row(&["Oslo", "Bo"])]).unwrap();

        combined.append(&more);
        combined.append(&Dataset::default());

        assert_eq!(combined.columns, row(&["Name", "City"]));
        assert_eq!(combined.rows, vec![row(&["Ann", ""]), row(&["Bo", "Oslo"])]);
        assert!(combined.rows.iter().all(|r| r.len() == combined.columns.len()));
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let combined = Dataset::concat(std::iter::empty());
        assert!(combined.columns.is_empty());
        assert!(combined.rows.is_empty());
    }

    #[test]
    fn html_is_escaped_and_styled() {
        let ds = Dataset::from_rows("t", row(&["<b>"]), vec![row(&["a & b"])]).unwrap();
        let html = ds.to_html();
        assert!(html.starts_with("<table border=\"1\" class=\"table table-bordered table-striped\">"));
        assert!(html.contains("<th>&lt;b&gt;</th>"));
        assert!(html.contains("<td>a &amp; b</td>"));
        assert!(!html.contains("<b>"));
    }
}
