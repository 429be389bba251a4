//! JSON rendering of an analysis.

use crate::error::{Error, Result};
use crate::model::Analysis;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an analysis to JSON. Image bytes are left out.
pub fn to_json(analysis: &Analysis, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(analysis),
        JsonFormat::Compact => serde_json::to_string(analysis),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Classification, DetectedToc, ExtractedImage, ImageFormat, ImageRecord, ImageRef, Page,
        TocEntry,
    };

    fn sample() -> Analysis {
        let mut analysis = Analysis::default();
        analysis.info.title = Some("Test".to_string());
        analysis.pages.push(Page::letter(1));
        let mut c = Classification::new(1);
        c.headers.push("Header".to_string());
        analysis.classifications.push(c);
        analysis.toc = DetectedToc::Entries(vec![TocEntry::new("Intro", 3)]);
        analysis.images.insert_if_absent(ImageRecord::new(
            ImageRef::new(7, 0, "Im0"),
            1,
            ExtractedImage {
                data: vec![0xAB; 64],
                format: ImageFormat::Png,
                width: 8,
                height: 8,
            },
        ));
        analysis
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Test"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_json_shape() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["toc"]["mode"], "entries");
        assert_eq!(value["toc"]["items"][0]["page"], 3);
        assert_eq!(value["classifications"][0]["headers"][0], "Header");
        assert_eq!(value["images"][0]["first_page"], 1);
        assert_eq!(value["images"][0]["format"], "png");
        assert!(value["images"][0].get("data").is_none());
    }
}
