//! Synthetic PDF fixtures built with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// One line of text drawn at a user-space position.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub text: String,
}

impl TextLine {
    pub fn new(x: f32, y: f32, size: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            size,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PageSpec {
    lines: Vec<TextLine>,
    with_image: bool,
}

/// Builds US Letter documents with Helvetica text and an optional shared
/// image XObject.
#[derive(Debug, Default)]
pub struct PdfBuilder {
    pages: Vec<PageSpec>,
    title: Option<String>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Add a page with the given lines.
    pub fn page(mut self, lines: Vec<TextLine>) -> Self {
        self.pages.push(PageSpec {
            lines,
            with_image: false,
        });
        self
    }

    /// Add a page that also references the shared image.
    pub fn page_with_image(mut self, lines: Vec<TextLine>) -> Self {
        self.pages.push(PageSpec {
            lines,
            with_image: true,
        });
        self
    }

    /// Add a page with no content at all.
    pub fn blank_page(self) -> Self {
        self.page(Vec::new())
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let image_id = self
            .pages
            .iter()
            .any(|p| p.with_image)
            .then(|| doc.add_object(shared_image()));

        let mut kids = Vec::new();
        for spec in &self.pages {
            let page_id = add_page(&mut doc, pages_id, font_id, image_id, spec);
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

        if let Some(title) = self.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
                "Author" => Object::string_literal("Fixture"),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    image_id: Option<ObjectId>,
    spec: &PageSpec,
) -> ObjectId {
    let mut operations = Vec::new();
    for line in &spec.lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), Object::Real(line.size)]));
        operations.push(Operation::new("Td", vec![Object::Real(line.x), Object::Real(line.y)]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                line.text.as_bytes().to_vec(),
                StringFormat::Literal,
            )],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let mut resources = dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    };
    if let (true, Some(image_id)) = (spec.with_image, image_id) {
        operations.push(Operation::new("q", vec![]));
        operations.push(Operation::new(
            "cm",
            vec![
                100.into(),
                0.into(),
                0.into(),
                100.into(),
                72.into(),
                300.into(),
            ],
        ));
        operations.push(Operation::new("Do", vec!["Im0".into()]));
        operations.push(Operation::new("Q", vec![]));
        resources.set("XObject", dictionary! { "Im0" => image_id });
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => resources,
    })
}

/// A 2x2 uncompressed RGB image.
fn shared_image() -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ],
    )
}

/// A page with one header line, two body paragraphs and one footer line.
pub fn report_page(header: &str, body: &[&str], footer: &str) -> Vec<TextLine> {
    let mut lines = vec![TextLine::new(72.0, 750.0, 10.0, header)];
    let mut y = 500.0;
    for text in body {
        lines.push(TextLine::new(72.0, y, 11.0, *text));
        y -= 60.0;
    }
    lines.push(TextLine::new(72.0, 40.0, 9.0, footer));
    lines
}

/// A contents page with dot-leader entries.
pub fn contents_page(entries: &[(&str, u32)]) -> Vec<TextLine> {
    let mut lines = vec![TextLine::new(72.0, 650.0, 16.0, "Table of Contents")];
    let mut y = 600.0;
    for (title, page) in entries {
        lines.push(TextLine::new(
            72.0,
            y,
            11.0,
            format!("{} ........ {}", title, page),
        ));
        y -= 40.0;
    }
    lines
}

/// A contents page followed by two report pages that share one image.
pub fn sample_report() -> Vec<u8> {
    PdfBuilder::new()
        .title("Quarterly Report")
        .page(contents_page(&[("Introduction", 2), ("Results", 3)]))
        .page_with_image(report_page(
            "ACME Quarterly",
            &["Introduction", "Revenue grew in every region."],
            "Confidential",
        ))
        .page_with_image(report_page(
            "ACME Quarterly",
            &["Results", "Margins held steady."],
            "Confidential",
        ))
        .build()
}
