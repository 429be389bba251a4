//! Benchmarks for pdfsift analysis and export.
//!
//! Run with: cargo bench
//!
//! Documents are generated with lopdf so the numbers do not depend on
//! fixture files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use pdfsift::export::{self, Reconstruction};
use pdfsift::{ExtractOptions, TocMode};

/// Creates a document whose first page lists contents and whose other
/// pages carry a header, a few paragraphs and a footer.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for i in 0..page_count {
        let lines: Vec<(i64, String)> = if i == 0 {
            let mut lines = vec![(700, "Contents".to_string())];
            for p in 1..page_count {
                lines.push((660 - 20 * p as i64, format!("Section {} ........ {}", p, p + 1)));
            }
            lines
        } else {
            vec![
                (760, "Benchmark Report".to_string()),
                (600, format!("Section {}", i)),
                (560, "Measured content for layout analysis and classification.".to_string()),
                (520, "Another paragraph follows with more words to wrap.".to_string()),
                (40, format!("Page {}", i + 1)),
            ]
        };

        let mut operations = Vec::new();
        for (y, text) in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 11.into()]));
            operations.push(Operation::new("Td", vec![72.into(), y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(text.into_bytes(), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap_or_default(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Benchmark PDF header sniffing.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("sniff_valid_pdf", |b| {
        b.iter(|| pdfsift::sniff(black_box(&pdf_data)).unwrap());
    });

    c.bench_function("sniff_non_pdf", |b| {
        b.iter(|| pdfsift::sniff(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark a full analysis at various sizes.
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    for page_count in [1, 5, 20].iter() {
        let data = create_test_pdf(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let options = ExtractOptions::new().lenient();
                pdfsift::analyze_bytes_with_options(black_box(&data), options).unwrap()
            });
        });
    }

    group.bench_function("20_pages_pattern_toc_no_tables", |b| {
        let data = create_test_pdf(20);
        b.iter(|| {
            let options = ExtractOptions::new()
                .with_toc_mode(TocMode::pattern())
                .with_tables(false);
            pdfsift::analyze_bytes_with_options(black_box(&data), options).unwrap()
        });
    });

    group.finish();
}

/// Benchmark the artifacts built from one analysis.
fn bench_export(c: &mut Criterion) {
    let analysis = pdfsift::analyze_bytes(&create_test_pdf(20)).unwrap();

    c.bench_function("export_text_report", |b| {
        b.iter(|| export::to_text(black_box(&analysis)));
    });

    c.bench_function("export_toc_csv", |b| {
        b.iter(|| export::toc_csv(black_box(&analysis.toc)));
    });

    c.bench_function("export_rebuilt_pdf", |b| {
        b.iter(|| {
            Reconstruction::from_classifications(black_box(&analysis.classifications))
                .to_pdf()
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_format_detection, bench_analysis, bench_export);
criterion_main!(benches);
