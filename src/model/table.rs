//! Table types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A table as a row-major grid of cell texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Rows in the table, each a list of cell texts
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    /// Create a grid from rows.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get plain text representation of the table, cells separated by tabs.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Tables found in a document, keyed by page number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTables {
    /// Page number to tables on that page, in detection order
    pub pages: BTreeMap<u32, Vec<Grid>>,
}

impl PageTables {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table found on a page.
    pub fn push(&mut self, page: u32, grid: Grid) {
        self.pages.entry(page).or_default().push(grid);
    }

    /// Tables on one page.
    pub fn page(&self, page: u32) -> &[Grid] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate `(page, table index starting at 1, grid)` in page order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize, &Grid)> {
        self.pages.iter().flat_map(|(page, grids)| {
            grids
                .iter()
                .enumerate()
                .map(move |(i, grid)| (*page, i + 1, grid))
        })
    }

    /// Total number of tables.
    pub fn table_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// Check if no tables were found.
    pub fn is_empty(&self) -> bool {
        self.table_count() == 0
    }
}
