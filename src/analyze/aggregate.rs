//! Whole-document accumulation of per-page results.

use crate::model::{Classification, Page, PageSummary};

/// A text line and the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLine {
    /// Page number (1-indexed)
    pub page: u32,
    /// Line text, untrimmed
    pub text: String,
}

/// Append-only accumulator for one run.
///
/// Pages must be pushed in increasing page order.
#[derive(Debug, Default)]
pub struct DocumentAggregator {
    summaries: Vec<PageSummary>,
    classifications: Vec<Classification>,
    page_texts: Vec<(u32, String)>,
    lines: Vec<PageLine>,
}

impl DocumentAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decoded page and its classification.
    pub fn push(&mut self, page: &Page, classification: Classification) {
        debug_assert!(
            self.summaries.last().map_or(true, |s| s.number < page.number),
            "pages must arrive in order"
        );

        self.summaries.push(page.summary());
        self.classifications.push(classification);
        self.lines.extend(page.text.lines().map(|line| PageLine {
            page: page.number,
            text: line.to_string(),
        }));
        self.page_texts.push((page.number, page.text.clone()));
    }

    /// Number of pages recorded so far.
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// Check if no page was recorded.
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Freeze the accumulated state.
    pub fn finish(self) -> Aggregate {
        Aggregate {
            summaries: self.summaries,
            classifications: self.classifications,
            page_texts: self.page_texts,
            lines: self.lines,
        }
    }
}

/// Read-only view of a finished run's pages.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// Per-page metadata, in page order
    pub summaries: Vec<PageSummary>,
    /// Classifications, in page order
    pub classifications: Vec<Classification>,
    page_texts: Vec<(u32, String)>,
    lines: Vec<PageLine>,
}

impl Aggregate {
    /// Every text line of every page, in document order.
    pub fn lines(&self) -> &[PageLine] {
        &self.lines
    }

    /// Lines from pages numbered `cap` or lower.
    pub fn lines_up_to(&self, cap: Option<u32>) -> impl Iterator<Item = &PageLine> {
        self.lines
            .iter()
            .filter(move |line| cap.map_or(true, |cap| line.page <= cap))
    }

    /// Raw text of each page, in page order.
    pub fn page_texts(&self) -> impl Iterator<Item = (u32, &str)> {
        self.page_texts.iter().map(|(n, t)| (*n, t.as_str()))
    }

    /// Raw text of one page.
    pub fn page_text(&self, page: u32) -> Option<&str> {
        self.page_texts
            .iter()
            .find(|(n, _)| *n == page)
            .map(|(_, t)| t.as_str())
    }
}
