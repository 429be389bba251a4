//! Table of contents as CSV.

use crate::model::DetectedToc;

/// CSV header row.
pub const TOC_CSV_HEADER: &str = "Title,Page";

/// Render the detected contents as a `Title,Page` CSV document.
///
/// Lines found in pattern mode have no parsed page, so their `Page` column
/// is empty.
pub fn toc_csv(toc: &DetectedToc) -> String {
    let mut out = String::from(TOC_CSV_HEADER);
    out.push('\n');

    match toc {
        DetectedToc::Entries(entries) => {
            for entry in entries {
                out.push_str(&format!("{},{}\n", csv_escape(&entry.title), entry.page));
            }
        }
        DetectedToc::Lines(lines) => {
            for line in lines {
                out.push_str(&csv_escape(line));
                out.push_str(",\n");
            }
        }
    }

    out
}

fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
