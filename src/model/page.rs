//! Page-level types.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// An axis-aligned box in top-down page coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// A box is well formed when its top edge is not below its bottom edge.
    pub fn is_well_formed(&self) -> bool {
        self.y0 <= self.y1
    }
}

/// A positioned run of text produced by layout analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Bounding box on the page
    pub bbox: BBox,
    /// Block text, lines separated by `\n`
    pub text: String,
}

impl TextBlock {
    /// Create a new text block.
    pub fn new(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }
}

/// Where a hyperlink points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum LinkKind {
    /// External URI
    Uri(String),
    /// Destination inside this document
    GoTo {
        /// Resolved page number, when the destination names a page object
        page: Option<u32>,
        /// Named destination, when the destination is given by name
        name: Option<String>,
    },
    /// Named viewer action (`NextPage`, `PrevPage`, ...)
    Named(String),
    /// Launch an application or open a file
    Launch(String),
    /// Destination in another document
    RemoteGoTo(String),
    /// Any other action type, by name
    Other(String),
}

impl LinkKind {
    /// Short human-readable description of the target.
    pub fn describe(&self) -> String {
        match self {
            LinkKind::Uri(uri) => uri.clone(),
            LinkKind::GoTo {
                page: Some(page), ..
            } => format!("page {}", page),
            LinkKind::GoTo {
                name: Some(name), ..
            } => format!("#{}", name),
            LinkKind::GoTo { .. } => "internal destination".to_string(),
            LinkKind::Named(action) => format!("action {}", action),
            LinkKind::Launch(file) => format!("launch {}", file),
            LinkKind::RemoteGoTo(file) => format!("remote {}", file),
            LinkKind::Other(action) => format!("unsupported action {}", action),
        }
    }
}

/// A `/Link` annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Clickable area
    pub rect: BBox,
    /// Link target
    #[serde(flatten)]
    pub kind: LinkKind,
}

/// Opaque reference to an embedded image.
///
/// Two references are the same image when they name the same indirect
/// object; the resource name is kept for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    /// Indirect object number
    pub object: u32,
    /// Generation number
    pub generation: u16,
    /// Resource name on the page that first listed it (e.g. `Im0`)
    pub name: String,
}

impl ImageRef {
    /// Create a new reference.
    pub fn new(object: u32, generation: u16, name: impl Into<String>) -> Self {
        Self {
            object,
            generation,
            name: name.into(),
        }
    }

    /// The `(object, generation)` pair identifying the image.
    pub fn id(&self) -> (u32, u16) {
        (self.object, self.generation)
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ImageRef {}

impl Hash for ImageRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.object, self.generation)
    }
}

/// A single decoded page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i64,

    /// Raw text in reading order
    pub text: String,

    /// Positioned text blocks
    pub blocks: Vec<TextBlock>,

    /// Hyperlinks
    pub links: Vec<Link>,

    /// Embedded images referenced by the page
    pub images: Vec<ImageRef>,

    /// Problems met while decoding this page that did not stop it
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            rotation: 0,
            text: String::new(),
            blocks: Vec::new(),
            links: Vec::new(),
            images: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Check if the page carries any non-whitespace text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Summary used by the page metadata panel.
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            number: self.number,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            text_length: self.text.chars().count(),
            link_count: self.links.len(),
            image_count: self.images.len(),
        }
    }
}

/// Per-page metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    /// Page number (1-indexed)
    pub number: u32,
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
    /// Rotation in degrees
    pub rotation: i64,
    /// Number of characters of raw text
    pub text_length: usize,
    /// Number of hyperlinks
    pub link_count: usize,
    /// Number of embedded image references
    pub image_count: usize,
}

impl PageSummary {
    /// Size as `"W x H"`.
    pub fn size_label(&self) -> String {
        format!("{} x {}", self.width, self.height)
    }
}
