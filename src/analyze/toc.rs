//! Table of contents detection from page text lines.

use regex::Regex;

use crate::model::{DetectedToc, TocEntry};
use crate::options::TocMode;

use super::aggregate::Aggregate;

/// Substrings that mark a page as a contents listing.
const CONTENTS_MARKERS: [&str; 2] = ["Contents", "Table of Contents"];

/// Finds contents entries in the text lines of a document.
pub struct TocDetector {
    mode: TocMode,
    /// A dot leader followed by a page number at the end of a line
    leader_regex: Regex,
    /// `title <spaces> page` with a page number of up to four digits
    entry_regex: Regex,
    /// Dot leader left at the end of a captured title, spaced or not
    trailing_leader_regex: Regex,
}

impl TocDetector {
    /// Create a detector for the given mode.
    pub fn new(mode: TocMode) -> Self {
        Self {
            mode,
            leader_regex: Regex::new(r"\.{2,}\s*\d+$").unwrap(),
            entry_regex: Regex::new(r"^(.*?)\s+(\d{1,4})$").unwrap(),
            trailing_leader_regex: Regex::new(r"(?:\s*\.){2,}\s*$").unwrap(),
        }
    }

    /// Detection mode.
    pub fn mode(&self) -> TocMode {
        self.mode
    }

    /// Run detection over a finished aggregate.
    pub fn detect(&self, aggregate: &Aggregate) -> DetectedToc {
        match self.mode {
            TocMode::Pattern { page_cap } => DetectedToc::Lines(
                self.match_leader_lines(
                    aggregate
                        .lines_up_to(page_cap)
                        .map(|line| line.text.as_str()),
                ),
            ),
            TocMode::Structured { page_cap } => {
                let marker_pages = self.marker_pages(aggregate, page_cap);
                if marker_pages.is_empty() {
                    log::debug!("toc: no contents page within the first {} pages", page_cap);
                    return DetectedToc::Entries(Vec::new());
                }
                log::debug!("toc: contents markers on pages {:?}", marker_pages);

                let entries = aggregate
                    .lines()
                    .iter()
                    .filter(|line| marker_pages.contains(&line.page))
                    .filter_map(|line| self.parse_entry(&line.text))
                    .collect();
                DetectedToc::Entries(entries)
            }
        }
    }

    /// Trimmed lines that end in a dot leader and a number, in input order.
    pub fn match_leader_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        lines
            .into_iter()
            .map(str::trim)
            .filter(|line| self.leader_regex.is_match(line))
            .map(String::from)
            .collect()
    }

    /// Parse one `title ... page` line.
    ///
    /// Lines without a digit are rejected before matching. A page number of
    /// zero is not a valid target and yields no entry.
    pub fn parse_entry(&self, line: &str) -> Option<TocEntry> {
        let line = line.trim();
        if !line.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }

        let caps = self.entry_regex.captures(line)?;
        let page: u32 = caps.get(2)?.as_str().parse().ok()?;
        if page == 0 {
            return None;
        }

        let raw_title = caps.get(1).map_or("", |m| m.as_str());
        Some(TocEntry::new(self.clean_title(raw_title), page))
    }

    fn clean_title(&self, raw: &str) -> String {
        let title = match raw.strip_suffix(" .") {
            Some(stem) if !stem.ends_with('.') => format!("{}.", stem),
            _ => raw.to_string(),
        };
        self.trailing_leader_regex
            .replace(&title, "")
            .trim()
            .to_string()
    }

    /// Pages within the cap whose text contains a contents marker.
    fn marker_pages(&self, aggregate: &Aggregate, page_cap: u32) -> Vec<u32> {
        aggregate
            .page_texts()
            .filter(|(page, _)| *page <= page_cap)
            .filter(|(_, text)| CONTENTS_MARKERS.iter().any(|m| text.contains(m)))
            .map(|(page, _)| page)
            .collect()
    }
}

impl Default for TocDetector {
    fn default() -> Self {
        Self::new(TocMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::aggregate::DocumentAggregator;
    use crate::model::{Classification, Page};

    fn aggregate(pages: &[&str]) -> Aggregate {
        let mut agg = DocumentAggregator::new();
        for (i, text) in pages.iter().enumerate() {
            let mut page = Page::letter(i as u32 + 1);
            page.text = text.to_string();
            agg.push(&page, Classification::new(page.number));
        }
        agg.finish()
    }

    #[test]
    fn test_structured_entry() {
        let detector = TocDetector::default();
        assert_eq!(
            detector.parse_entry("Introduction .......... 5"),
            Some(TocEntry::new("Introduction", 5))
        );
        assert_eq!(detector.parse_entry("No digits here"), None);
    }

    #[test]
    fn test_structured_entry_variants() {
        let detector = TocDetector::default();
        assert_eq!(
            detector.parse_entry("  2.1 Scope   12  "),
            Some(TocEntry::new("2.1 Scope", 12))
        );
        assert_eq!(
            detector.parse_entry("Chapter 1 . 7"),
            Some(TocEntry::new("Chapter 1.", 7))
        );
        // More than four digits is not a page number
        assert_eq!(detector.parse_entry("Total 12345"), None);
        // Digits but no separating space
        assert_eq!(detector.parse_entry("Version2"), None);
        assert_eq!(detector.parse_entry("Cover 0"), None);
    }

    #[test]
    fn test_structured_entry_spaced_leaders() {
        let detector = TocDetector::default();
        assert_eq!(
            detector.parse_entry("Introduction . . . . 5"),
            Some(TocEntry::new("Introduction", 5))
        );
        assert_eq!(
            detector.parse_entry("Introduction . . . . . . . 5"),
            Some(TocEntry::new("Introduction", 5))
        );
        assert_eq!(
            detector.parse_entry("Methods . . . . .. 9"),
            Some(TocEntry::new("Methods", 9))
        );
        // Dotted numbering inside the title stays
        assert_eq!(
            detector.parse_entry("2.1 Scope . . . 12"),
            Some(TocEntry::new("2.1 Scope", 12))
        );
    }

    #[test]
    fn test_pattern_mode_keeps_order_and_duplicates() {
        let detector = TocDetector::new(TocMode::pattern());
        let agg = aggregate(&[
            "Intro ..... 1\nplain line\nIntro ..... 1",
            "  Methods ..7  \nEnds with dots ..",
        ]);
        assert_eq!(
            detector.detect(&agg),
            DetectedToc::Lines(vec![
                "Intro ..... 1".to_string(),
                "Intro ..... 1".to_string(),
                "Methods ..7".to_string(),
            ])
        );
    }

    #[test]
    fn test_pattern_mode_page_cap() {
        let detector = TocDetector::new(TocMode::pattern().with_page_cap(1));
        let agg = aggregate(&["A .. 1", "B .. 2"]);
        assert_eq!(detector.detect(&agg).len(), 1);
    }

    #[test]
    fn test_structured_mode_only_marker_pages() {
        let detector = TocDetector::default();
        let agg = aggregate(&[
            "Table of Contents\nIntroduction .......... 5\nMethods .......... 9",
            "Results are in table 3 and figure 4",
            "Contents (cont.)\nAppendix .......... 41",
        ]);
        assert_eq!(
            detector.detect(&agg),
            DetectedToc::Entries(vec![
                TocEntry::new("Introduction", 5),
                TocEntry::new("Methods", 9),
                TocEntry::new("Appendix", 41),
            ])
        );
    }

    #[test]
    fn test_structured_mode_without_marker_is_empty() {
        let detector = TocDetector::default();
        let agg = aggregate(&["Introduction .......... 5"]);
        assert!(detector.detect(&agg).is_empty());
    }

    #[test]
    fn test_structured_mode_respects_cap() {
        let detector = TocDetector::new(TocMode::structured().with_page_cap(1));
        let agg = aggregate(&["Preface", "Contents\nIntro .... 3"]);
        assert!(detector.detect(&agg).is_empty());
    }

    #[test]
    fn test_page_numbers_not_validated() {
        let detector = TocDetector::default();
        let agg = aggregate(&["Contents\nIndex .......... 999"]);
        assert_eq!(
            detector.detect(&agg),
            DetectedToc::Entries(vec![TocEntry::new("Index", 999)])
        );
    }
}
