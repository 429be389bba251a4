//! Embedded image types and the deduplicating image store.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::ImageRef;

/// Encoded image format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// PNG, re-encoded from raw samples
    Png,
    /// JPEG passthrough (`DCTDecode`)
    Jpeg,
    /// JPEG 2000 passthrough (`JPXDecode`)
    Jpx,
}

impl ImageFormat {
    /// Format tag, also used as the file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Jpx => "jpx",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl Serialize for ImageFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.extension())
    }
}

/// Image bytes as returned by a page source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// Encoded bytes
    pub data: Vec<u8>,
    /// Encoding of `data`
    pub format: ImageFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// One unique embedded image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    /// Reference the image was found under
    pub reference: ImageRef,

    /// Page on which the image was first seen; never updated afterwards
    pub first_page: u32,

    /// Encoded bytes
    #[serde(skip_serializing)]
    pub data: Vec<u8>,

    /// Encoding of `data`
    pub format: ImageFormat,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

impl ImageRecord {
    /// Build a record from an extracted image.
    pub fn new(reference: ImageRef, first_page: u32, image: ExtractedImage) -> Self {
        Self {
            reference,
            first_page,
            data: image.data,
            format: image.format,
            width: image.width,
            height: image.height,
        }
    }
}

/// Insertion-ordered store holding one record per image reference.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    records: IndexMap<ImageRef, ImageRecord>,
}

impl ImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a reference already has a record.
    pub fn contains(&self, reference: &ImageRef) -> bool {
        self.records.contains_key(reference)
    }

    /// Insert a record unless its reference is already present.
    ///
    /// Returns `true` when the record was inserted. An existing record,
    /// including its `first_page`, is never replaced.
    pub fn insert_if_absent(&mut self, record: ImageRecord) -> bool {
        if self.records.contains_key(&record.reference) {
            return false;
        }
        self.records.insert(record.reference.clone(), record);
        true
    }

    /// Look up a record.
    pub fn get(&self, reference: &ImageRef) -> Option<&ImageRecord> {
        self.records.get(reference)
    }

    /// Number of unique images.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.values()
    }

    /// Archive file names for every record, in first-seen order.
    ///
    /// Names follow `page{first_page}_img{n}.{ext}`, where `n` counts the
    /// records first seen on that page starting at 1.
    pub fn file_names(&self) -> Vec<(String, &ImageRecord)> {
        let mut per_page: IndexMap<u32, usize> = IndexMap::new();
        self.iter()
            .map(|record| {
                let n = per_page.entry(record.first_page).or_insert(0);
                *n += 1;
                let name = format!(
                    "page{}_img{}.{}",
                    record.first_page,
                    n,
                    record.format.extension()
                );
                (name, record)
            })
            .collect()
    }
}

impl Serialize for ImageStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(object: u32, page: u32) -> ImageRecord {
        ImageRecord::new(
            ImageRef::new(object, 0, format!("Im{}", object)),
            page,
            ExtractedImage {
                data: vec![1, 2, 3],
                format: ImageFormat::Png,
                width: 1,
                height: 1,
            },
        )
    }

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut store = ImageStore::new();
        assert!(store.insert_if_absent(record(7, 2)));
        assert!(!store.insert_if_absent(record(7, 5)));

        assert_eq!(store.len(), 1);
        let kept = store.get(&ImageRef::new(7, 0, "")).unwrap();
        assert_eq!(kept.first_page, 2);
    }

    #[test]
    fn test_file_names_count_per_page() {
        let mut store = ImageStore::new();
        store.insert_if_absent(record(1, 1));
        store.insert_if_absent(record(2, 1));
        store.insert_if_absent(record(3, 4));

        let names: Vec<String> = store.file_names().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["page1_img1.png", "page1_img2.png", "page4_img1.png"]
        );
    }

    #[test]
    fn test_store_serializes_without_bytes() {
        let mut store = ImageStore::new();
        store.insert_if_absent(record(9, 3));
        let json = serde_json::to_string(&store).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"first_page\":3"));
        assert!(json.contains("\"format\":\"png\""));
        assert!(!json.contains("\"data\""));
    }
}
