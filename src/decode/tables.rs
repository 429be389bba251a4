//! Table extraction using text position analysis (stream mode).
//!
//! Tables are found from text alignment alone: spans are grouped into rows
//! by baseline, column edges are the left edges shared by enough rows, and
//! runs of rows that line up with those edges become tables. Bullet and
//! numbered lists, which look like two aligned columns, are rejected.

use std::collections::{HashMap, HashSet};

use lopdf::Document;

use crate::error::{Error, Result};
use crate::model::{Grid, PageTables};

use super::layout::{LayoutAnalyzer, TextSpan};

/// Finds tables in a whole document.
///
/// Runs once per document after the page loop. A failure here is reported
/// by the pipeline and does not abort the run.
pub trait TableExtractor {
    /// Extract every table of the document in `data`.
    fn extract_tables(&self, data: &[u8]) -> Result<PageTables>;
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// A row of text spans in a table.
#[derive(Debug, Clone)]
struct TableRowData {
    /// Spans in this row, sorted by X
    spans: Vec<TextSpan>,
}

/// Stream-mode table extractor built on the layout analyzer.
#[derive(Debug, Clone, Default)]
pub struct StreamTableExtractor {
    config: TableDetectorConfig,
}

impl StreamTableExtractor {
    /// Create a new extractor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new extractor with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables among the spans of one page.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<Grid> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "tables: {} rows, column edges at {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        let mut grids = Vec::new();
        for (start_row, end_row) in self.find_table_regions(&rows, &columns) {
            let table_rows = &rows[start_row..=end_row];

            // Re-detect columns for this specific region
            let table_columns = self.detect_columns(table_rows);
            if table_columns.len() < self.config.min_columns {
                continue;
            }
            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "tables: skipping region, too many columns ({} > {})",
                    table_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(table_rows, &table_columns) {
                log::debug!("tables: skipping region, looks like a list");
                continue;
            }

            grids.push(self.to_grid(table_rows, &table_columns));
        }

        grids
    }

    /// Group spans into rows by Y position, top of the page first.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<TableRowData> {
        let mut sorted_spans = spans.to_vec();
        sorted_spans.sort_by(|a, b| {
            let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let mut rows: Vec<TableRowData> = Vec::new();
        let mut current_row_spans: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted_spans {
            let y_tolerance = span.font_size * self.config.y_tolerance_factor;

            match current_y {
                Some(y) if (span.y - y).abs() <= y_tolerance => {
                    current_row_spans.push(span);
                }
                _ => {
                    if !current_row_spans.is_empty() {
                        rows.push(make_row(std::mem::take(&mut current_row_spans)));
                    }
                    current_y = Some(span.y);
                    current_row_spans.push(span);
                }
            }
        }

        if !current_row_spans.is_empty() {
            rows.push(make_row(current_row_spans));
        }

        rows
    }

    /// Detect column boundaries from the left edges of text.
    ///
    /// Rows with several spans are the best evidence; when too few exist,
    /// every span of every row votes instead.
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        let multi_span_rows: Vec<&TableRowData> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();

        if multi_span_rows.len() >= self.config.min_rows {
            self.aligned_edges(&multi_span_rows, true)
        } else {
            let all: Vec<&TableRowData> = rows.iter().collect();
            self.aligned_edges(&all, false)
        }
    }

    fn aligned_edges(&self, rows: &[&TableRowData], once_per_row: bool) -> Vec<f32> {
        if rows.is_empty() {
            return vec![];
        }

        let bucket_size = 5.0;
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();

        for row in rows {
            let buckets = row.spans.iter().map(|s| (s.x / bucket_size).round() as i32);
            if once_per_row {
                for bucket in buckets.collect::<HashSet<_>>() {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            } else {
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
        }

        let min_occurrences =
            ((rows.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut column_edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * bucket_size)
            .collect();
        column_edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Merge close edges
        let mut merged_edges: Vec<f32> = Vec::new();
        for edge in column_edges {
            match merged_edges.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged_edges.push(edge),
            }
        }

        merged_edges
    }

    /// Find contiguous row regions that form tables.
    fn find_table_regions(&self, rows: &[TableRowData], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions: Vec<(usize, usize)> = Vec::new();
        let mut current_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if self.calculate_alignment_score(row, columns) >= self.config.min_alignment_ratio {
                current_start.get_or_insert(i);
            } else if let Some(start) = current_start.take() {
                if i - start >= self.config.min_rows {
                    regions.push((start, i - 1));
                }
            }
        }

        if let Some(start) = current_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans that start on a column edge.
    fn calculate_alignment_score(&self, row: &TableRowData, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }

        let tolerance = 5.0;
        let aligned_spans = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= tolerance))
            .count();

        aligned_spans as f32 / row.spans.len() as f32
    }

    /// Lay the region's spans out as a row-major grid of cell texts.
    fn to_grid(&self, rows: &[TableRowData], columns: &[f32]) -> Grid {
        let right_x = rows
            .iter()
            .flat_map(|r| r.spans.iter())
            .map(TextSpan::right)
            .fold(f32::MIN, f32::max);

        let grid_rows = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
                for span in &row.spans {
                    let col_idx = find_column_for_span(span.x, columns, right_x);
                    cells[col_idx].push(span.text.trim());
                }
                cells.into_iter().map(|parts| parts.join(" ")).collect()
            })
            .collect();

        Grid::new(grid_rows)
    }

    /// Check if rows actually represent a numbered or bulleted list.
    ///
    /// A list item's marker and text are often separate spans at fixed X
    /// positions, which looks like a two-column table.
    fn is_list_pattern(&self, rows: &[TableRowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullet_count = 0;
        let mut number_count = 0;

        for row in rows {
            // Spans are sorted by X, so the first is the leftmost
            if let Some(span) = row.spans.first() {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullet_count += 1;
                } else if is_number_marker(text) {
                    number_count += 1;
                }
            }
        }

        let bullet_ratio = bullet_count as f32 / rows.len() as f32;
        let total_ratio = (bullet_count + number_count) as f32 / rows.len() as f32;

        // Numbered first columns are common in real tables, so only reject
        // two-column layouts on numbers
        bullet_ratio >= 0.5 || (columns.len() == 2 && total_ratio >= 0.5)
    }
}

impl TableExtractor for StreamTableExtractor {
    fn extract_tables(&self, data: &[u8]) -> Result<PageTables> {
        let doc = Document::load_mem(data).map_err(|e| Error::TableExtract(e.to_string()))?;
        let analyzer = LayoutAnalyzer::new(&doc);
        let mut tables = PageTables::new();

        for (page_num, page_id) in doc.get_pages() {
            let spans = analyzer
                .extract_page_spans(page_id)
                .map_err(|e| Error::TableExtract(format!("page {}: {}", page_num, e)))?;
            for grid in self.detect(&spans) {
                tables.push(page_num, grid);
            }
        }

        log::debug!("tables: {} found", tables.table_count());
        Ok(tables)
    }
}

fn make_row(mut spans: Vec<TextSpan>) -> TableRowData {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    TableRowData { spans }
}

/// Find which column a span belongs to based on its X position.
fn find_column_for_span(span_x: f32, columns: &[f32], right_x: f32) -> usize {
    // Allow spans to start slightly (10pt) before their column edge
    for (i, &col_start) in columns.iter().enumerate() {
        let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
            return i;
        }
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (span_x - **a)
                .abs()
                .partial_cmp(&(span_x - **b).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Check if text is a bullet marker.
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "※"
            | "□" | "◆" | "◇" | "▶" | "▷" | "☞" | "➤" | "➜"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    // Digits followed by "." or ")"
    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (prefix, suffix) = cleaned.split_at(pos);
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    // Letter marker: "a.", "B)"
    let chars: Vec<char> = cleaned.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')')
}
