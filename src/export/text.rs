//! Human-readable report of an analysis.

use crate::model::{Analysis, NoticeLevel, Page, Region};

/// Render every section of an analysis as plain text.
///
/// Sections follow the order of a run: document info, then per page the
/// metadata, text, links, headers and footers; then the table of contents,
/// tables, images and any warnings or errors. Empty sections say so.
pub fn to_text(analysis: &Analysis) -> String {
    let mut out = String::new();

    write_document(&mut out, analysis);
    for page in &analysis.pages {
        write_page(&mut out, analysis, page);
    }
    write_toc(&mut out, analysis);
    write_tables(&mut out, analysis);
    write_images(&mut out, analysis);
    write_problems(&mut out, analysis);

    out.trim_end().to_string() + "\n"
}

fn write_document(out: &mut String, analysis: &Analysis) {
    let info = &analysis.info;
    out.push_str("Document\n");
    if let Some(title) = &info.title {
        out.push_str(&format!("  Title: {}\n", title));
    }
    if let Some(author) = &info.author {
        out.push_str(&format!("  Author: {}\n", author));
    }
    out.push_str(&format!("  Pages: {}\n", info.page_count));
    if !info.pdf_version.is_empty() {
        out.push_str(&format!("  PDF version: {}\n", info.pdf_version));
    }
    if info.encrypted {
        out.push_str("  Encrypted: yes\n");
    }
}

fn write_page(out: &mut String, analysis: &Analysis, page: &Page) {
    let summary = page.summary();
    out.push_str(&format!("\n=== Page {} ===\n", page.number));

    out.push_str("\nPage Metadata\n");
    out.push_str(&format!("  Page Number: {}\n", summary.number));
    out.push_str(&format!("  Size: {}\n", summary.size_label()));
    out.push_str(&format!("  Rotation: {}\n", summary.rotation));
    out.push_str(&format!("  Text Length: {}\n", summary.text_length));
    out.push_str(&format!("  Number of Links: {}\n", summary.link_count));
    out.push_str(&format!(
        "  Number of Embedded Images: {}\n",
        summary.image_count
    ));

    out.push_str("\nExtracted Text\n");
    if page.has_text() {
        out.push_str(page.text.trim_end());
        out.push('\n');
    } else {
        out.push_str("  No text found on this page.\n");
    }

    out.push_str("\nPage Links\n");
    if page.links.is_empty() {
        out.push_str("  No links found on this page.\n");
    }
    for link in &page.links {
        out.push_str(&format!(
            "  - {} at ({:.1}, {:.1}, {:.1}, {:.1})\n",
            link.kind.describe(),
            link.rect.x0,
            link.rect.y0,
            link.rect.x1,
            link.rect.y1
        ));
    }

    out.push_str("\nHeaders & Footers\n");
    let Some(classification) = analysis.classification(page.number) else {
        return;
    };
    for (region, plural) in [(Region::Header, "headers"), (Region::Footer, "footers")] {
        let texts = classification.region(region);
        if texts.is_empty() {
            out.push_str(&format!("  No {} detected.\n", plural));
            continue;
        }
        out.push_str(&format!("  {}s:\n", region.label()));
        for text in texts {
            out.push_str("  - ");
            out.push_str(&text.replace('\n', " "));
            out.push('\n');
        }
    }
}

fn write_toc(out: &mut String, analysis: &Analysis) {
    out.push_str("\n=== Detected Table of Contents ===\n");
    if analysis.toc.is_empty() {
        out.push_str("No Table of Contents entries detected.\n");
    }
    for line in analysis.toc.display_lines() {
        out.push_str("• ");
        out.push_str(&line);
        out.push('\n');
    }
}

fn write_tables(out: &mut String, analysis: &Analysis) {
    out.push_str("\n=== Tables ===\n");

    let failure = analysis
        .notices_at(NoticeLevel::Error)
        .find(|n| n.page.is_none() && n.message.starts_with("Table extraction failed"));
    if let Some(notice) = failure {
        out.push_str(&notice.message);
        out.push('\n');
        return;
    }
    if analysis.tables.is_empty() {
        out.push_str("No tables detected in the PDF.\n");
        return;
    }

    for (page, index, grid) in analysis.tables.iter() {
        out.push_str(&format!("\nPage {} - Table {}\n", page, index));
        out.push_str(&grid.plain_text());
        out.push('\n');
    }
}

fn write_images(out: &mut String, analysis: &Analysis) {
    out.push_str("\n=== Embedded Images ===\n");
    if analysis.images.is_empty() {
        out.push_str("No embedded images found in the entire PDF.\n");
    }
    for (idx, record) in analysis.images.iter().enumerate() {
        out.push_str(&format!(
            "Image {} (first seen on Page {}, format: {}, {}x{})\n",
            idx + 1,
            record.first_page,
            record.format,
            record.width,
            record.height
        ));
    }
}

fn write_problems(out: &mut String, analysis: &Analysis) {
    let problems: Vec<_> = analysis
        .notices
        .iter()
        .filter(|n| n.level >= NoticeLevel::Warning)
        .collect();
    if problems.is_empty() {
        return;
    }

    out.push_str("\n=== Warnings ===\n");
    for notice in problems {
        out.push_str(&format!("{}\n", notice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BBox, Classification, DetectedToc, Grid, Link, LinkKind, Notice, TocEntry,
    };

    fn analysis() -> Analysis {
        let mut analysis = Analysis::default();
        analysis.info.page_count = 2;

        let mut first = Page::letter(1);
        first.text = "Report\n\nBody".to_string();
        first.links.push(Link {
            rect: BBox::new(72.0, 100.0, 200.0, 112.0),
            kind: LinkKind::Uri("https://example.com".to_string()),
        });
        analysis.pages.push(first);
        analysis.pages.push(Page::letter(2));

        let mut c = Classification::new(1);
        c.headers.push("Report".to_string());
        c.body.push("Body".to_string());
        analysis.classifications.push(c);
        analysis.classifications.push(Classification::new(2));
        analysis
    }

    #[test]
    fn test_page_section_layout() {
        let text = to_text(&analysis());
        assert!(text.starts_with("Document\n  Pages: 2\n\n=== Page 1 ===\n\nPage Metadata\n"));
        assert!(text.contains("\nExtracted Text\nReport\n\nBody\n\nPage Links\n"));
        assert!(text.ends_with("No embedded images found in the entire PDF.\n"));
    }

    #[test]
    fn test_empty_states() {
        let text = to_text(&analysis());
        assert!(text.contains("No text found on this page."));
        assert!(text.contains("No links found on this page."));
        assert!(text.contains("No footers detected."));
        assert!(text.contains("No Table of Contents entries detected."));
        assert!(text.contains("No tables detected in the PDF."));
        assert!(text.contains("No embedded images found in the entire PDF."));
        assert!(!text.contains("=== Warnings ==="));
    }

    #[test]
    fn test_sections_filled() {
        let mut a = analysis();
        a.toc = DetectedToc::Entries(vec![TocEntry::new("Intro", 2)]);
        a.tables.push(
            1,
            Grid::new(vec![vec!["a".to_string(), "b".to_string()]]),
        );

        let text = to_text(&a);
        assert!(text.contains("  Headers:\n  - Report"));
        assert!(text.contains("https://example.com"));
        assert!(text.contains("• Intro .... 2"));
        assert!(text.contains("Page 1 - Table 1\na\tb"));
        assert!(text.contains("Size: 612 x 792"));
    }

    #[test]
    fn test_table_failure_and_warnings() {
        let mut a = analysis();
        a.notices
            .push(Notice::error("Table extraction failed: broken xref"));
        a.notices
            .push(Notice::warning("Error extracting image 5 0 R: bad filter").on_page(2));

        let text = to_text(&a);
        assert!(text.contains("=== Tables ===\nTable extraction failed: broken xref"));
        assert!(text.contains("[warning] page 2: Error extracting image 5 0 R"));
    }
}
