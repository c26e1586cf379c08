//! Table types.

use serde::{Deserialize, Serialize};

/// One cell of a table grid. `None` means the extractor found nothing there.
pub type Cell = Option<String>;

/// A table as a grid of optional string cells.
///
/// Rows are not required to have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Create a table from a prepared grid.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Create a table from string values; empty strings stay empty cells.
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| Some(c.into())).collect())
                .collect(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows that hold at least one non-empty cell, in order.
    pub fn content_rows(&self) -> impl Iterator<Item = &Vec<Cell>> {
        self.rows.iter().filter(|row| !row_is_empty(row))
    }

    /// Check if no cell of the table has content.
    pub fn is_blank(&self) -> bool {
        self.content_rows().next().is_none()
    }
}

/// A cell is empty when absent or the empty string.
pub fn cell_is_empty(cell: &Cell) -> bool {
    cell.as_deref().map_or(true, str::is_empty)
}

/// A row is empty when every cell in it is empty.
pub fn row_is_empty(row: &[Cell]) -> bool {
    row.iter().all(cell_is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_new() {
        let table = Table::new();
        assert_eq!(table.row_count(), 0);
        assert!(table.is_blank());
    }

    #[test]
    fn test_content_rows_skip_empty() {
        let table = Table::from_rows(vec![
            vec![Some("A".into()), None],
            vec![None, Some(String::new())],
            vec![Some("1".into()), Some("2".into())],
        ]);
        assert_eq!(table.content_rows().count(), 2);
        assert!(!table.is_blank());
    }

    #[test]
    fn test_add_row() {
        let mut table = Table::new();
        table.add_row(vec![None, None]);
        assert!(table.is_blank());

        table.add_row(vec![Some("X1".into()), Some("5kW".into())]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.content_rows().count(), 1);
        assert_eq!(
            table,
            Table::from_rows(vec![
                vec![None, None],
                vec![Some("X1".into()), Some("5kW".into())],
            ])
        );
    }

    #[test]
    fn test_whitespace_cell_is_content() {
        assert!(!cell_is_empty(&Some(" ".to_string())));
        assert!(cell_is_empty(&Some(String::new())));
        assert!(cell_is_empty(&None));
    }
}
