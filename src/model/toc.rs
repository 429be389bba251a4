//! Table of contents types.

use serde::{Deserialize, Serialize};

/// One parsed contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Entry title with the dot leader removed
    pub title: String,
    /// Page number printed next to the title
    pub page: u32,
}

impl TocEntry {
    /// Create a new entry.
    pub fn new(title: impl Into<String>, page: u32) -> Self {
        Self {
            title: title.into(),
            page,
        }
    }
}

/// Result of contents detection.
///
/// Both variants keep source order and duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "items", rename_all = "snake_case")]
pub enum DetectedToc {
    /// Matching lines, verbatim after trimming
    Lines(Vec<String>),
    /// Parsed `(title, page)` entries
    Entries(Vec<TocEntry>),
}

impl DetectedToc {
    /// Number of detected items.
    pub fn len(&self) -> usize {
        match self {
            DetectedToc::Lines(lines) => lines.len(),
            DetectedToc::Entries(entries) => entries.len(),
        }
    }

    /// Check if nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items rendered one per line for display.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            DetectedToc::Lines(lines) => lines.clone(),
            DetectedToc::Entries(entries) => entries
                .iter()
                .map(|e| format!("{} .... {}", e.title, e.page))
                .collect(),
        }
    }
}

impl Default for DetectedToc {
    fn default() -> Self {
        DetectedToc::Entries(Vec::new())
    }
}
